// SPDX-License-Identifier: MIT

use flowforge_core::{Block, BlockId, BlockTypeId, Command, CommandKind, FakeBlock};
use flowforge_core::{InstanceId, RunnableState, TemplateId, UserId};
use flowforge_engine::{Instance, InstanceConfig, ProcessingUnit};
use std::time::Duration;

fn block(id: &str) -> Box<dyn Block> {
    Box::new(FakeBlock::new(
        BlockId::new(id).unwrap(),
        BlockTypeId::new("echo").unwrap(),
    ))
}

fn config(id: u64, name: &str) -> InstanceConfig {
    InstanceConfig::new(
        InstanceId::new(id).unwrap(),
        TemplateId::new(1).unwrap(),
        UserId::new(1).unwrap(),
        name,
    )
}

#[tokio::test(start_paused = true)]
async fn the_tick_worker_drives_a_registered_instance_to_completion() {
    let unit = ProcessingUnit::new(Duration::from_millis(5), Duration::from_millis(100));
    let instance = unit
        .add_instance(Instance::new(config(1, "auto").with_blocks(vec![block("a")])).unwrap())
        .unwrap();

    unit.start_processing();
    for _ in 0..4 {
        tokio::time::advance(Duration::from_millis(5)).await;
        tokio::task::yield_now().await;
    }

    assert_eq!(instance.state(), RunnableState::Done);
    unit.stop_processing().await;
}

#[tokio::test(start_paused = true)]
async fn a_command_queued_before_start_is_applied_on_the_first_tick() {
    let unit = ProcessingUnit::new(Duration::from_millis(5), Duration::from_millis(100));
    let instance = unit
        .add_instance(
            Instance::new(
                config(2, "stop-immediately")
                    .with_blocks(vec![block("a")]),
            )
            .unwrap(),
        )
        .unwrap();

    unit.put_command(Command::new(CommandKind::Stop, InstanceId::new(2).unwrap()));

    unit.start_processing();
    tokio::time::advance(Duration::from_millis(5)).await;
    tokio::task::yield_now().await;

    assert_eq!(instance.state(), RunnableState::Stopped);
    unit.stop_processing().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_and_restarting_the_worker_is_safe() {
    let unit = ProcessingUnit::new(Duration::from_millis(5), Duration::from_millis(100));
    unit.add_instance(Instance::new(config(3, "idle").with_blocks(vec![block("a")])).unwrap())
        .unwrap();

    unit.start_processing();
    tokio::time::advance(Duration::from_millis(5)).await;
    tokio::task::yield_now().await;
    unit.stop_processing().await;

    unit.start_processing();
    tokio::time::advance(Duration::from_millis(5)).await;
    tokio::task::yield_now().await;
    unit.stop_processing().await;
}
