// Kinds of cereal a container can be dedicated to

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Cereal {
    Buckwheat,
    Rice,
    Millet,
    Peas,
    Bulgur,
    Oatmeal,
    Semolina,
}

impl Cereal {
    /// Human-readable name shown in storage listings
    pub fn label(&self) -> &'static str {
        match self {
            Cereal::Buckwheat => "Buckwheat",
            Cereal::Rice => "Rice",
            Cereal::Millet => "Millet",
            Cereal::Peas => "Peas",
            Cereal::Bulgur => "Bulgur",
            Cereal::Oatmeal => "Oatmeal",
            Cereal::Semolina => "Semolina",
        }
    }

    /// Returns an iterator over all cereals
    pub fn all() -> impl Iterator<Item = Cereal> {
        Cereal::iter()
    }
}
