//! 状态快照
//!
//! 由外部状态包解码器产出的某一时刻的机械臂状态。快照一旦生成即不可变，
//! 下一次轮询时整体替换，不存在部分更新。

use crate::joint::{Joint, JointArray};
use crate::mode::{JointMode, RobotMode};
use crate::ProtocolError;

/// 状态快照
///
/// 所有关节数组长度恒为 6，且按关节编号下标对齐。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    /// 整机模式
    pub robot_mode: RobotMode,
    /// 各关节模式
    pub joint_modes: JointArray<JointMode>,
    /// 各关节速度（rad/s）
    pub joint_velocities: JointArray<f64>,
    /// 各关节角度（rad）
    pub joint_angles: JointArray<f64>,
}

impl StatusSnapshot {
    /// 创建所有关节模式一致、速度和角度为零的快照
    pub fn uniform(robot_mode: RobotMode, joint_mode: JointMode) -> Self {
        Self {
            robot_mode,
            joint_modes: JointArray::splat(joint_mode),
            joint_velocities: JointArray::splat(0.0),
            joint_angles: JointArray::splat(0.0),
        }
    }

    /// 从控制器原始数值编码构建快照
    ///
    /// 未知的模式编码会被解析为 `Unknown`，不会失败。
    pub fn from_raw(
        robot_mode: i32,
        joint_modes: [i32; 6],
        joint_velocities: [f64; 6],
        joint_angles: [f64; 6],
    ) -> Self {
        Self {
            robot_mode: RobotMode::from(robot_mode),
            joint_modes: JointArray::new(joint_modes.map(JointMode::from)),
            joint_velocities: JointArray::new(joint_velocities),
            joint_angles: JointArray::new(joint_angles),
        }
    }

    /// 获取指定关节的模式
    #[inline]
    pub fn joint_mode(&self, joint: Joint) -> JointMode {
        self.joint_modes[joint]
    }

    /// 获取指定关节的速度
    #[inline]
    pub fn joint_velocity(&self, joint: Joint) -> f64 {
        self.joint_velocities[joint]
    }

    /// 检查数值字段是否有限（解码器偶尔会产出 NaN）
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for joint in Joint::ALL {
            let velocity = self.joint_velocities[joint];
            if !velocity.is_finite() {
                return Err(ProtocolError::InvalidValue {
                    field: format!("joint_velocities[{}]", joint.index()),
                    value: velocity,
                });
            }
            let angle = self.joint_angles[joint];
            if !angle.is_finite() {
                return Err(ProtocolError::InvalidValue {
                    field: format!("joint_angles[{}]", joint.index()),
                    value: angle,
                });
            }
        }
        Ok(())
    }

    /// 返回替换了单个关节模式的新快照
    #[must_use]
    pub fn with_joint_mode(mut self, joint: Joint, mode: JointMode) -> Self {
        self.joint_modes[joint] = mode;
        self
    }

    /// 返回替换了单个关节速度的新快照
    #[must_use]
    pub fn with_joint_velocity(mut self, joint: Joint, velocity: f64) -> Self {
        self.joint_velocities[joint] = velocity;
        self
    }
}
