//! 高层运动指令
//!
//! 每个变体都是自包含的输入，由派发器按变体穷举匹配处理。

use serde::{Deserialize, Serialize};
use std::fmt;
use urarm_protocol::{Deg, Meter};

/// 机械臂指令
///
/// 支持以 JSON/TOML 形式输入，例如 `{"command": "move_cam", "pan": 10.0, "tilt": 20.0, "height": 0.5}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ArmCommand {
    /// 上电/断电
    Power { is_on: bool },
    /// 抱闸：`true` 立即停止，`false` 恢复运行模式
    Brakes { enable: bool },
    /// 关节自动初始化
    AutoInit,
    /// 相机笛卡尔位姿
    MoveCam { pan: Deg, tilt: Deg, height: Meter },
    /// 六关节目标角度（度）
    MoveJoints { angles: [Deg; 6] },
    /// 初始化模式下单关节点动
    JointMove { joint_id: u8, dir: bool },
    /// 设置 home
    SetHome,
    /// 预设位置（`"giraffe"` 或 `"home"`）
    SetPosition { name: String },
    /// 带 pan/tilt 的长颈鹿位，`position` 必须为 `"giraffe"`
    SetPositionGiraffe { position: String, pan: Deg, tilt: Deg },
    /// 末端执行器（协议未覆盖，接受但不执行）
    MoveEffector,
}

impl ArmCommand {
    /// 指令名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            ArmCommand::Power { .. } => "power",
            ArmCommand::Brakes { .. } => "brakes",
            ArmCommand::AutoInit => "auto_init",
            ArmCommand::MoveCam { .. } => "move_cam",
            ArmCommand::MoveJoints { .. } => "move_joints",
            ArmCommand::JointMove { .. } => "joint_move",
            ArmCommand::SetHome => "set_home",
            ArmCommand::SetPosition { .. } => "set_position",
            ArmCommand::SetPositionGiraffe { .. } => "set_position_giraffe",
            ArmCommand::MoveEffector => "move_effector",
        }
    }
}

impl fmt::Display for ArmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
