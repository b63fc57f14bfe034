//! 安全包络与点动速度的属性测试
//!
//! 使用 proptest 验证边界与速度表。

mod common;

use common::dispatcher_for;
use common::mock_arm::MockArm;
use proptest::prelude::*;
use urarm_client::{ArmCommand, ErrorKind, JogConfig, SafetyEnvelope, jog_speed};
use urarm_protocol::{Deg, Joint, Meter};

fn joint_strategy() -> impl Strategy<Value = Joint> {
    (0usize..6).prop_map(|i| Joint::ALL[i])
}

proptest! {
    /// 包络内的 pan 被接受，包络外被拒绝
    #[test]
    fn pan_envelope(pan in -180.0..180.0f64) {
        let env = SafetyEnvelope::default();
        let inside = (-45.0..=45.0).contains(&pan);
        prop_assert_eq!(env.check_pan(Deg(pan)).is_ok(), inside);
    }

    /// 相机高度闭区间 [0.1, 1.0]
    #[test]
    fn height_envelope(height in -1.0..3.0f64) {
        let env = SafetyEnvelope::default();
        let inside = (0.1..=1.0).contains(&height);
        prop_assert_eq!(env.check_height(Meter(height)).is_ok(), inside);
    }

    /// 关节 1-5 的角度只检查下限
    #[test]
    fn joint_angles_lower_bound_only_for_later_joints(
        first in 0.0..=360.0f64,
        rest in proptest::array::uniform5(0.0..1000.0f64),
    ) {
        let env = SafetyEnvelope::default();
        let angles = [first, rest[0], rest[1], rest[2], rest[3], rest[4]].map(Deg);
        prop_assert!(env.check_joint_angles(&angles).is_ok());
    }

    /// 速度符号由方向决定，幅值按关节缩放，其余槽位为零
    #[test]
    fn jog_speed_table(base in 0.001..1.0f64, joint in joint_strategy(), dir in any::<bool>()) {
        let jog = JogConfig { base_speed: base, ..JogConfig::default() };
        let speed = jog_speed(&jog, joint, dir);

        let divisor = match joint.index() {
            0 | 1 => 3.0,
            2 => 2.0,
            _ => 1.0,
        };
        prop_assert!((speed.abs() - base / divisor).abs() < 1e-12);
        prop_assert_eq!(speed > 0.0, dir);
    }

    /// 写入的 tilt 等于 90 - tilt
    #[test]
    fn move_cam_tilt_is_complemented(
        pan in -45.0..=45.0f64,
        tilt in -90.0..=90.0f64,
        height in 0.1..=1.0f64,
    ) {
        let arm = MockArm::running();
        let (mut dispatcher, _) = dispatcher_for(&arm);
        let command = ArmCommand::MoveCam { pan: Deg(pan), tilt: Deg(tilt), height: Meter(height) };

        prop_assert!(dispatcher.dispatch(&command).unwrap().ok);
        let input = dispatcher.primitive().read();
        prop_assert_eq!(input.inputs[0], pan);
        prop_assert_eq!(input.inputs[1], 90.0 - tilt);
        prop_assert_eq!(input.inputs[2], height);
    }

    /// 包络外的 pan 不产生任何副作用
    #[test]
    fn out_of_envelope_pan_has_no_side_effect(pan in prop_oneof![-180.0..-45.001f64, 45.001..180.0f64]) {
        let arm = MockArm::running();
        let (mut dispatcher, _) = dispatcher_for(&arm);
        let command = ArmCommand::MoveCam { pan: Deg(pan), tilt: Deg(0.0), height: Meter(0.5) };

        let result = dispatcher.dispatch(&command).unwrap();
        prop_assert_eq!(result.error_kind, Some(ErrorKind::InvalidInput));
        prop_assert_eq!(dispatcher.primitive().sequence(), 0);
        prop_assert!(arm.lines().is_empty());
    }
}
