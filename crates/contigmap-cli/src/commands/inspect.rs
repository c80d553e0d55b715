use crate::cli::InspectArgs;
use crate::error::Result;
use contigmap::core::contig::block::{ContigSpec, ReceptorPolicy, apply_implicit_terminator};
use contigmap::core::models::chain::ChainRole;
use contigmap::engine::error::ContigError;
use tracing::debug;

#[derive(Debug, PartialEq, Eq)]
struct BlockSummary {
    block: String,
    role: ChainRole,
}

fn summarize(contigs: &str, topology_only: bool) -> Result<Vec<BlockSummary>> {
    let spec: ContigSpec = contigs.parse().map_err(ContigError::from)?;
    let mut blocks = spec.into_blocks();
    apply_implicit_terminator(&mut blocks);

    let policy = ReceptorPolicy::from_topology_flag(topology_only);
    Ok(blocks
        .iter()
        .map(|block| {
            let role = policy.classify(block);
            debug!(block = %block, %role, "Classified block.");
            BlockSummary {
                block: block.to_string(),
                role,
            }
        })
        .collect())
}

pub fn run(args: InspectArgs) -> Result<()> {
    let summaries = summarize(&args.contigs, args.topology_only)?;
    for (index, summary) in summaries.iter().enumerate() {
        println!("{:>3}  {:<8}  {}", index, summary.role, summary.block);
    }
    Ok(())
}
