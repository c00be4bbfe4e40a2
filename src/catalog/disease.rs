use serde::{Deserialize, Serialize};

/// The ten paddy conditions the sample catalog is labelled with.
///
/// Discriminants match the catalog index and the identifier the prediction
/// service returns for each class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    BacterialLeafBlight = 0,
    BacterialLeafStreak = 1,
    BacterialPanicleBlight = 2,
    Blast = 3,
    BrownSpot = 4,
    DeadHeart = 5,
    DownyMildew = 6,
    Hispa = 7,
    Normal = 8,
    Tungro = 9,
}

impl Disease {
    pub const ALL: [Disease; 10] = [
        Disease::BacterialLeafBlight,
        Disease::BacterialLeafStreak,
        Disease::BacterialPanicleBlight,
        Disease::Blast,
        Disease::BrownSpot,
        Disease::DeadHeart,
        Disease::DownyMildew,
        Disease::Hispa,
        Disease::Normal,
        Disease::Tungro,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Disease::BacterialLeafBlight    => "Bacterial Leaf Blight",
            Disease::BacterialLeafStreak    => "Bacterial Leaf Streak",
            Disease::BacterialPanicleBlight => "Bacterial Panicle Blight",
            Disease::Blast                  => "Blast",
            Disease::BrownSpot              => "Brown Spot",
            Disease::DeadHeart              => "Dead Heart",
            Disease::DownyMildew            => "Downy Mildew",
            Disease::Hispa                  => "Hispa",
            Disease::Normal                 => "Normal",
            Disease::Tungro                 => "Tungro",
        }
    }

    pub fn from_index(index: usize) -> Option<Disease> {
        Disease::ALL.get(index).copied()
    }

    /// Resolves a route identifier such as `"3"` to a known disease.
    pub fn from_route_id(id: &str) -> Option<Disease> {
        id.trim().parse::<usize>().ok().and_then(Disease::from_index)
    }
}
