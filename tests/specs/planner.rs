// SPDX-License-Identifier: MIT

use flowforge_core::{Block, BlockId, BlockTypeId, FakeBlock, Line};
use flowforge_core::{InstanceId, RunnableState, TemplateId, UserId};
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
fn a_single_source_block_runs_to_completion() {
    let cfg = config(1, "single").with_blocks(vec![block("a")]);
    let instance = Instance::new(cfg).unwrap();

    instance.run().unwrap(); // plan
    assert_eq!(instance.state(), RunnableState::Running);
    instance.run().unwrap(); // dispatch
    assert_eq!(instance.state(), RunnableState::Done);
}

#[test]
fn a_diamond_shaped_graph_completes_every_block_exactly_once() {
    // a -> b, a -> c, b -> d, c -> d
    let cfg = config(2, "diamond")
        .with_blocks(vec![block("a"), block("b"), block("c"), block("d")])
        .with_lines(vec![
            Line::new(BlockId::new("a").unwrap(), BlockId::new("b").unwrap()),
            Line::new(BlockId::new("a").unwrap(), BlockId::new("c").unwrap()),
            Line::new(BlockId::new("b").unwrap(), BlockId::new("d").unwrap()),
            Line::new(BlockId::new("c").unwrap(), BlockId::new("d").unwrap()),
        ]);
    let instance = Instance::new(cfg).unwrap();

    instance.run().unwrap(); // plan: only `a` has no incoming line
    for _ in 0..4 {
        if instance.state() == RunnableState::Done {
            break;
        }
        instance.run().unwrap();
    }

    assert_eq!(instance.state(), RunnableState::Done);
}

#[test]
fn duplicate_instance_ids_are_rejected_by_the_processing_unit() {
    use flowforge_core::EngineError;
    use flowforge_engine::ProcessingUnit;
    use std::time::Duration;

    let unit = ProcessingUnit::new(Duration::from_millis(10), Duration::from_millis(50));
    unit.add_instance(Instance::new(config(3, "first").with_blocks(vec![block("a")])).unwrap())
        .unwrap();

    let result = unit.add_instance(
        Instance::new(config(3, "second").with_blocks(vec![block("a")])).unwrap(),
    );
    assert!(matches!(result, Err(EngineError::ObjectAlreadyExists(_))));
}
