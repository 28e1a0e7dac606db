use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ChannelType {
    #[default]
    Direct,
    Global,
}

impl Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channel_type = match self {
            ChannelType::Direct => "direct",
            ChannelType::Global => "global",
        };
        write!(f, "{}", channel_type)
    }
}

impl ChannelType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "global" => ChannelType::Global,
            _ => ChannelType::Direct,
        }
    }
}
