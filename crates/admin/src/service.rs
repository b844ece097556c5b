//! Typed admin handlers.
//!
//! Every handler is synchronous, calls at most one collaborator operation
//! (alias-chain calls two, plus its rollback) and returns collaborator errors
//! untouched.

use crate::alias::AliasCoordinator;
use crate::profiler::{ProfilerController, ProfilerState};
use crate::types::*;
use corelib::{
    network_name, AliasRegistrar, ChainResolver, NetworkDirectory, NodeIdentity,
    ProfilingBackend, Result, StackDumper,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// External subsystems the admin service talks to.
///
/// Handed over once at construction; the service never reaches for
/// process-wide singletons.
#[derive(Clone)]
pub struct Collaborators {
    pub network: Arc<dyn NetworkDirectory>,
    pub chains: Arc<dyn ChainResolver>,
    pub routes: Arc<dyn AliasRegistrar>,
    pub profiling: Arc<dyn ProfilingBackend>,
    pub stacks: Arc<dyn StackDumper>,
}

/// The admin API service.
pub struct AdminService {
    identity: Arc<NodeIdentity>,
    network: Arc<dyn NetworkDirectory>,
    chains: Arc<dyn ChainResolver>,
    stacks: Arc<dyn StackDumper>,
    profiler: ProfilerController,
    aliases: AliasCoordinator,
}

fn record_call(method: &'static str) {
    metrics::counter!("admin_calls_total", "method" => method).increment(1);
}

impl AdminService {
    pub fn new(identity: Arc<NodeIdentity>, collaborators: Collaborators) -> Self {
        let Collaborators {
            network,
            chains,
            routes,
            profiling,
            stacks,
        } = collaborators;

        Self {
            identity,
            network,
            aliases: AliasCoordinator::new(routes, Arc::clone(&chains)),
            chains,
            stacks,
            profiler: ProfilerController::new(profiling),
        }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn profiler_state(&self) -> ProfilerState {
        self.profiler.state()
    }

    /// Version this node is running.
    pub fn get_node_version(&self) -> GetNodeVersionReply {
        debug!("Admin: GetNodeVersion called");
        record_call("getNodeVersion");
        GetNodeVersionReply {
            version: self.identity.version().to_string(),
        }
    }

    pub fn get_node_id(&self) -> GetNodeIdReply {
        debug!("Admin: GetNodeID called");
        record_call("getNodeID");
        GetNodeIdReply {
            node_id: self.identity.node_id(),
        }
    }

    pub fn get_network_id(&self) -> GetNetworkIdReply {
        debug!("Admin: GetNetworkID called");
        record_call("getNetworkID");
        GetNetworkIdReply {
            network_id: self.identity.network_id(),
        }
    }

    pub fn get_network_name(&self) -> GetNetworkNameReply {
        debug!("Admin: GetNetworkName called");
        record_call("getNetworkName");
        GetNetworkNameReply {
            network_name: network_name(self.identity.network_id()),
        }
    }

    /// Chain id the alias resolves to.
    pub fn get_blockchain_id(&self, args: &GetBlockchainIdArgs) -> Result<GetBlockchainIdReply> {
        debug!(alias = %args.alias, "Admin: GetBlockchainID called");
        record_call("getBlockchainID");
        let blockchain_id = self.chains.lookup(&args.alias)?;
        Ok(GetBlockchainIdReply { blockchain_id })
    }

    /// Currently connected peers, as of this call.
    pub fn peers(&self) -> PeersReply {
        debug!("Admin: Peers called");
        record_call("peers");
        PeersReply {
            peers: self.network.snapshot_peers(),
        }
    }

    pub fn start_cpu_profiler(&self, args: &ProfileArgs) -> Result<SuccessReply> {
        debug!(filename = %args.filename, "Admin: StartCPUProfiler called");
        record_call("startCPUProfiler");
        self.profiler.start_cpu_profiler(Path::new(&args.filename))?;
        Ok(SuccessReply::OK)
    }

    pub fn stop_cpu_profiler(&self) -> Result<SuccessReply> {
        debug!("Admin: StopCPUProfiler called");
        record_call("stopCPUProfiler");
        self.profiler.stop_cpu_profiler()?;
        Ok(SuccessReply::OK)
    }

    pub fn memory_profile(&self, args: &ProfileArgs) -> Result<SuccessReply> {
        debug!(filename = %args.filename, "Admin: MemoryProfile called");
        record_call("memoryProfile");
        self.profiler.memory_profile(Path::new(&args.filename))?;
        Ok(SuccessReply::OK)
    }

    pub fn lock_profile(&self, args: &ProfileArgs) -> Result<SuccessReply> {
        debug!(filename = %args.filename, "Admin: LockProfile called");
        record_call("lockProfile");
        self.profiler.lock_profile(Path::new(&args.filename))?;
        Ok(SuccessReply::OK)
    }

    pub fn alias(&self, args: &AliasArgs) -> Result<SuccessReply> {
        debug!(endpoint = %args.endpoint, alias = %args.alias, "Admin: Alias called");
        record_call("alias");
        self.aliases.alias(&args.endpoint, &args.alias)?;
        Ok(SuccessReply::OK)
    }

    pub fn alias_chain(&self, args: &AliasChainArgs) -> Result<SuccessReply> {
        debug!(chain = %args.chain, alias = %args.alias, "Admin: AliasChain called");
        record_call("aliasChain");
        self.aliases.alias_chain(&args.chain, &args.alias)?;
        Ok(SuccessReply::OK)
    }

    /// Stack dump from the configured [`StackDumper`]. With the backtrace
    /// dumper this covers only the thread serving the request, not every
    /// thread in the process.
    pub fn stacktrace(&self) -> StacktraceReply {
        debug!("Admin: Stacktrace called");
        record_call("stacktrace");
        StacktraceReply {
            stacktrace: self.stacks.current_global_stack(),
        }
    }
}
