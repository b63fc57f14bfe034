//! 集成测试公共模块

#![allow(dead_code)]

pub mod mock_arm;

use std::sync::Arc;

use mock_arm::{MockArm, MockLink, MockStatus, RecordingSleeper};
use urarm_client::{CommandDispatcher, DispatcherConfig};
use urarm_driver::MotionPrimitiveSlot;

pub type MockDispatcher = CommandDispatcher<MockLink, MockStatus, RecordingSleeper>;

/// 连接到模拟机械臂的派发器（默认配置）
pub fn dispatcher_for(arm: &MockArm) -> (MockDispatcher, RecordingSleeper) {
    dispatcher_with_config(arm, DispatcherConfig::default())
}

pub fn dispatcher_with_config(
    arm: &MockArm,
    config: DispatcherConfig,
) -> (MockDispatcher, RecordingSleeper) {
    let sleeper = RecordingSleeper::default();
    let dispatcher = CommandDispatcher::new(
        Arc::new(config),
        arm.link(),
        arm.source(),
        MotionPrimitiveSlot::new(),
    )
    .with_sleeper(sleeper.clone());
    (dispatcher, sleeper)
}
