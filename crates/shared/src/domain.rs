use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(GameId);
id_newtype!(RefId);

/// A named catalog entity attached to a game (developer, publisher, genre, platform).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: RefId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "non_empty")]
    pub released: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    pub id: GameId,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "non_empty")]
    pub released: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub developers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publishers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "non_empty")]
    pub description_raw: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub website: Option<String>,
    #[serde(default)]
    pub ratings_count: u64,
}

impl GameDetail {
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            name: self.name.clone(),
            background_image: self.background_image.clone(),
            rating: self.rating,
            released: self.released.clone(),
        }
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_treats_blank_strings_as_missing() {
        let game: GameSummary = serde_json::from_value(serde_json::json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "background_image": "",
            "rating": 4.47,
            "released": null
        }))
        .expect("summary");

        assert_eq!(game.id, GameId(3498));
        assert_eq!(game.background_image, None);
        assert_eq!(game.released, None);
    }

    #[test]
    fn detail_tolerates_null_collections() {
        let game: GameDetail = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Portal",
            "rating": 4.5,
            "developers": null,
            "platforms": [{ "platform": { "id": 4, "name": "PC" } }],
            "website": "",
            "ratings_count": 12
        }))
        .expect("detail");

        assert!(game.developers.is_empty());
        assert!(game.publishers.is_empty());
        assert_eq!(game.platforms[0].platform.name, "PC");
        assert_eq!(game.website, None);
        assert_eq!(game.summary().name, "Portal");
    }
}
