// SPDX-License-Identifier: MIT

use flowforge_core::{Block, BlockId, BlockTypeId, EngineError, FakeBlock, InstanceId};
use flowforge_core::{RunnableState, TemplateId, UserId};
use flowforge_engine::{Instance, InstanceConfig};

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

#[test]
fn stop_during_a_run_moves_straight_to_stopped_and_clears_the_plan() {
    let instance = Instance::new(
        config(1, "stop-mid-run").with_blocks(vec![
            Box::new(FakeBlock::new(BlockId::new("a").unwrap(), BlockTypeId::new("t").unwrap())
                .with_runs_to_complete(5)) as Box<dyn Block>,
        ]),
    )
    .unwrap();

    instance.run().unwrap(); // plan
    instance.run().unwrap(); // dispatch, block still Running (needs 5 calls)
    assert_eq!(instance.state(), RunnableState::Running);
    assert_eq!(instance.plan_len(), 1);

    instance.stop();
    assert_eq!(instance.state(), RunnableState::Stopped);
    assert_eq!(instance.plan_len(), 0);

    // run() is a no-op on a terminal instance.
    instance.run().unwrap();
    assert_eq!(instance.state(), RunnableState::Stopped);
}

#[test]
fn reset_clears_blocks_while_set_ready_preserves_their_progress() {
    let instance =
        Instance::new(config(2, "resettable").with_blocks(vec![block("a")])).unwrap();
    instance.run().unwrap();
    instance.run().unwrap();
    assert_eq!(instance.state(), RunnableState::Done);

    instance.reset();
    assert_eq!(instance.state(), RunnableState::Ready);

    instance.run().unwrap();
    instance.run().unwrap();
    assert_eq!(instance.state(), RunnableState::Done);

    instance.set_ready().unwrap();
    assert_eq!(instance.state(), RunnableState::Ready);
}

#[test]
fn running_a_not_configured_instance_raises_configuration_mismatch() {
    let instance = Instance::new_not_configured(
        InstanceId::new(3).unwrap(),
        TemplateId::new(1).unwrap(),
        UserId::new(1).unwrap(),
        "broken",
    );
    let result = instance.run();
    assert!(matches!(result, Err(EngineError::ConfigurationMismatch(_))));
    assert!(instance.has_error());
}
