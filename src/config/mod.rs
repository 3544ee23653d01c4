mod environment;
mod file;
mod resolver;

pub use environment::{host_name, user_name};
pub use file::{ConfigFile, GeneralOverrides};
pub use resolver::{
    COVER_FILE_NAME, ChannelConfig, Configuration, FEED_FILE_NAME, GeneralConfig, ItunesConfig,
    resolve,
};
