mod init;
mod load;
mod migrate;
mod recommend;
mod serve;

pub use init::cmd_init;
pub use load::{LoadArgs, cmd_load};
pub use migrate::cmd_migrate;
pub use recommend::{RecommendArgs, cmd_recommend};
pub use serve::cmd_serve;
