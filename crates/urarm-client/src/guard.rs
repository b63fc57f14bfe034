//! 模式守卫
//!
//! 基于最新状态快照的纯谓词，自身从不读取新快照。

use tracing::debug;
use urarm_protocol::{Joint, JointMode, RobotMode, StatusSnapshot};

/// 机械臂是否处于运行状态
///
/// 整机模式为 running，且六个关节模式全部为 running。
pub fn is_running(status: &StatusSnapshot) -> bool {
    if status.robot_mode != RobotMode::Running {
        debug!(
            "robot mode {} expected: {}",
            status.robot_mode,
            RobotMode::Running
        );
        return false;
    }

    for joint in Joint::ALL {
        let mode = status.joint_mode(joint);
        if mode != JointMode::Running {
            debug!("joint {} mode {} expected: {}", joint.index(), mode, JointMode::Running);
            return false;
        }
    }

    true
}

/// 机械臂是否处于初始化状态
///
/// 整机模式为 initializing，且每个关节模式为 initializing 或 running。
pub fn is_initialising(status: &StatusSnapshot) -> bool {
    status.robot_mode == RobotMode::Initializing
        && status
            .joint_modes
            .iter()
            .all(|mode| matches!(mode, JointMode::Initializing | JointMode::Running))
}

/// 机械臂是否已上电
///
/// 只有整机模式为 no_power 时视为断电；无法识别的模式码按已上电处理。
pub fn is_powered(status: &StatusSnapshot) -> bool {
    status.robot_mode != RobotMode::NoPower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_running() {
        let status = StatusSnapshot::uniform(RobotMode::Running, JointMode::Running);
        assert!(is_running(&status));

        let one_joint_idle = status.with_joint_mode(Joint::Wrist2, JointMode::Idle);
        assert!(!is_running(&one_joint_idle));

        let robot_idle = StatusSnapshot { robot_mode: RobotMode::Idle, ..status };
        assert!(!is_running(&robot_idle));
    }

    #[test]
    fn test_is_initialising() {
        let status = StatusSnapshot::uniform(RobotMode::Initializing, JointMode::Initializing);
        assert!(is_initialising(&status));

        let mixed = status
            .with_joint_mode(Joint::Wrist3, JointMode::Running)
            .with_joint_mode(Joint::Wrist2, JointMode::Running);
        assert!(is_initialising(&mixed));

        let with_error = mixed.with_joint_mode(Joint::Base, JointMode::Error);
        assert!(!is_initialising(&with_error));

        let running_robot = StatusSnapshot { robot_mode: RobotMode::Running, ..status };
        assert!(!is_initialising(&running_robot));
    }

    #[test]
    fn test_running_and_initialising_are_exclusive() {
        let running = StatusSnapshot::uniform(RobotMode::Running, JointMode::Running);
        assert!(is_running(&running) && !is_initialising(&running));

        let init = StatusSnapshot::uniform(RobotMode::Initializing, JointMode::Running);
        assert!(is_initialising(&init) && !is_running(&init));
    }

    #[test]
    fn test_is_powered() {
        assert!(!is_powered(&StatusSnapshot::uniform(RobotMode::NoPower, JointMode::PowerOff)));
        assert!(is_powered(&StatusSnapshot::uniform(RobotMode::Idle, JointMode::Idle)));
        assert!(is_powered(&StatusSnapshot::uniform(RobotMode::Unknown, JointMode::Unknown)));
        assert!(is_powered(&StatusSnapshot::default()));
    }
}
