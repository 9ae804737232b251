//! 进程内无锁队列
//!
//! 多生产者 / 单消费者，用于在回调线程、工作线程与宿主线程之间搬运消息

pub mod queue;
