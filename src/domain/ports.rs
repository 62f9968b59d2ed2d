use crate::domain::model::Block;

/// 可接收 block 的執行環境：main context（FIFO）與背景 pool（並行）
pub trait Executor: Send + Sync {
    fn execute(&self, block: Block);
}
