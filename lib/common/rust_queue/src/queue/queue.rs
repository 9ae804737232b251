/// 队列配置
#[derive(Debug, Clone)]
pub struct DefaultQueueConfig {
    /// 队列名称，仅用于日志
    pub name: String,
    /// 积压告警阈值，0 表示不告警
    pub warn_depth: usize,
}

impl Default for DefaultQueueConfig {
    fn default() -> Self {
        Self {
            name: "queue".to_string(),
            warn_depth: 10_000,
        }
    }
}

impl DefaultQueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_warn_depth(mut self, depth: usize) -> Self {
        self.warn_depth = depth;
        self
    }
}

/// 多生产者 / 单消费者队列接口
///
/// # 核心特性
/// - 无界：`enqueue` 永不阻塞、永不失败（只受内存限制）
/// - 非阻塞出队：`try_dequeue` 队列为空时立即返回 `None`
/// - 同一生产者的消息按入队顺序出队（FIFO）
///
/// 消费端只允许一个线程，多个线程同时出队不保证跨生产者的顺序。
pub trait Queue<T>: Send + Sync {
    /// 入队
    fn enqueue(&self, item: T);

    /// 尝试出队
    fn try_dequeue(&self) -> Option<T>;

    /// 当前积压数量（并发下只是近似值）
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取出调用时刻已经在队列中的全部消息，返回处理条数
    ///
    /// 以调用时的积压数量为上限，生产者持续写入时也不会无限循环。
    fn drain<F>(&self, mut f: F) -> usize
    where
        F: FnMut(T),
        Self: Sized,
    {
        let pending = self.len();
        let mut handled = 0;
        while handled < pending {
            match self.try_dequeue() {
                Some(item) => {
                    f(item);
                    handled += 1;
                }
                None => break,
            }
        }
        handled
    }
}
