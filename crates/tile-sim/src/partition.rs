//! Implementation for the `partition` subcommand.

use tile_engine::EngineConfig;
use tile_layout::plan_partition;
use tracing::info;

use crate::{desktop::SimDesktop, error::Result, report::ScreenPartition, scenario::Scenario};

/// Partition every screen of the scenario without moving anything.
pub fn run(scenario: &Scenario, config: &EngineConfig) -> Result<Vec<ScreenPartition>> {
    let desktop = SimDesktop::from_scenario(scenario)?;
    let windows = desktop.consumer_snapshots();
    let partitions = scenario
        .screens()
        .iter()
        .map(|screen| {
            let plan = plan_partition(&windows, screen, config.min_gap_render);
            info!(
                screen = %screen.id,
                owners = plan.assignments.len(),
                gaps = plan.gaps.len(),
                "partitioned"
            );
            ScreenPartition {
                screen: screen.id,
                owners: plan
                    .assignments
                    .iter()
                    .map(|(id, t)| (*id, t.rect))
                    .collect(),
                gaps: plan.gaps,
            }
        })
        .collect();
    Ok(partitions)
}
