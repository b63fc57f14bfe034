//! 指令输出通道
//!
//! 字节流接口：每条指令写为一行 ASCII 文本（以 `\n` 结尾）并立即 flush，
//! 不读取任何应答。底层流（TCP、串口、stdout）由调用方提供。

use crate::DriverError;
use std::io::Write;
use tracing::debug;
use urarm_protocol::ControllerCommand;

/// 指令输出通道
#[derive(Debug)]
pub struct CommandSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> CommandSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// 写出一条控制器指令
    pub fn send(&mut self, command: &ControllerCommand) -> Result<(), DriverError> {
        self.send_line(&command.to_string())
    }

    /// 写出一行原始文本（不含换行符）
    pub fn send_line(&mut self, line: &str) -> Result<(), DriverError> {
        debug!("-> {}", line);
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    /// 已写出的指令行数
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CommandSink<Vec<u8>> {
    /// 已写出的所有指令行（内存缓冲区，测试和回放使用）
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.writer)
            .lines()
            .map(str::to_string)
            .collect()
    }
}
