use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Serialize, Deserialize)]
pub enum Role {
    #[strum(serialize = "sindico")]
    #[serde(rename = "sindico")]
    Administrator,
    #[strum(serialize = "morador")]
    #[serde(rename = "morador")]
    Resident,
}
