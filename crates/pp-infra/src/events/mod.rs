mod channel;

pub use channel::ChannelAuthEventEmitter;
