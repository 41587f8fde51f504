//! 网络层：HTTP 传输抽象与带重试的 JSON 请求。

pub mod fetcher;
pub mod network;

#[cfg(test)]
pub(crate) mod testing;
