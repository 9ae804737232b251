pub mod mpsc_queue;
