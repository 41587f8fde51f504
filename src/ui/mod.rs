//! 交互层入口。
//!
//! 目前只有无 UI 模式：按命令行参数执行一次后退出。

pub mod noui;
