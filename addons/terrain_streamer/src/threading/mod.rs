pub mod thread_pool;

pub use thread_pool::TileBuildPool;
