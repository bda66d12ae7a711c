//! Typed view of the engine's hint document.
//!
//! The adapter treats engine output as opaque JSON. The current engine build
//! emits one of a handful of shapes, and this module recognizes them for
//! display purposes:
//!
//! ```json
//! {"error": -2}
//! {"action": "double", "data": {"cd": 3, "equity": [0.61, 0.84, 1.0, 0.84]}}
//! {"action": "beaver"}
//! {"action": "play", "data": [{"move": "24/18 13/11", "equity": [0.04, 0.02],
//!                              "eval": [0.52, 0.14, 0.01, 0.12, 0.01]}]}
//! ```
//!
//! Anything else yields `None`; nothing in the evaluation path depends on it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The engine's recommended action for a position.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// The engine could not analyse the position.
    Error { code: i64 },

    /// A cube decision with its equities.
    Cube {
        action: CubeAction,
        /// Engine-internal cube decision code.
        decision: i64,
        equity: CubeEquity,
    },

    /// An action that carries no data.
    Simple { action: SimpleAction },

    /// Candidate checker plays, best first.
    Play { moves: Vec<CandidateMove> },
}

/// Cube-related actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeAction {
    Roll,
    Double,
    Take,
    Drop,
}

impl CubeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Double => "double",
            Self::Take => "take",
            Self::Drop => "drop",
        }
    }
}

/// Actions reported without any data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleAction {
    AcceptResignation,
    RejectResignation,
    Beaver,
}

impl SimpleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptResignation => "accept resignation",
            Self::RejectResignation => "reject resignation",
            Self::Beaver => "beaver",
        }
    }
}

/// Cubeful equities for the three cube outcomes plus the optimal one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CubeEquity {
    pub no_double: f64,
    pub take: f64,
    pub drop: f64,
    pub optimal: f64,
}

/// One candidate play.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateMove {
    /// Move in plain notation, e.g. `24/18 13/11`.
    pub notation: String,
    /// Cubeful equity.
    pub equity: f64,
    pub cubeless_equity: f64,
    pub probabilities: Probabilities,
}

/// Game outcome probabilities from the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Probabilities {
    pub win: f64,
    pub win_gammon: f64,
    pub win_backgammon: f64,
    pub lose_gammon: f64,
    pub lose_backgammon: f64,
}

impl Probabilities {
    pub fn lose(&self) -> f64 {
        1.0 - self.win
    }
}

#[derive(Deserialize)]
struct RawCube {
    cd: i64,
    equity: [f64; 4],
}

#[derive(Deserialize)]
struct RawMove {
    #[serde(rename = "move")]
    notation: String,
    equity: [f64; 2],
    eval: [f64; 5],
}

impl Recommendation {
    /// Interpret a decoded hint document.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if let Some(code) = object.get("error") {
            return code.as_i64().map(|code| Self::Error { code });
        }

        let action = object.get("action")?.as_str()?;
        let data = object.get("data");

        match action {
            "roll" => Self::cube(CubeAction::Roll, data?),
            "double" => Self::cube(CubeAction::Double, data?),
            "take" => Self::cube(CubeAction::Take, data?),
            "drop" => Self::cube(CubeAction::Drop, data?),
            "accept resignation" => Some(Self::Simple {
                action: SimpleAction::AcceptResignation,
            }),
            "reject resignation" => Some(Self::Simple {
                action: SimpleAction::RejectResignation,
            }),
            "beaver" => Some(Self::Simple {
                action: SimpleAction::Beaver,
            }),
            "play" => Self::play(data?),
            _ => None,
        }
    }

    fn cube(action: CubeAction, data: &Value) -> Option<Self> {
        let raw = RawCube::deserialize(data).ok()?;
        let [no_double, take, drop, optimal] = raw.equity;
        Some(Self::Cube {
            action,
            decision: raw.cd,
            equity: CubeEquity {
                no_double,
                take,
                drop,
                optimal,
            },
        })
    }

    fn play(data: &Value) -> Option<Self> {
        let raw = Vec::<RawMove>::deserialize(data).ok()?;
        let moves = raw
            .into_iter()
            .map(|m| {
                let [win, win_gammon, win_backgammon, lose_gammon, lose_backgammon] = m.eval;
                CandidateMove {
                    notation: m.notation,
                    equity: m.equity[0],
                    cubeless_equity: m.equity[1],
                    probabilities: Probabilities {
                        win,
                        win_gammon,
                        win_backgammon,
                        lose_gammon,
                        lose_backgammon,
                    },
                }
            })
            .collect();
        Some(Self::Play { moves })
    }

    /// Name of the recommended action as the engine spells it.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Cube { action, .. } => action.as_str(),
            Self::Simple { action } => action.as_str(),
            Self::Play { .. } => "play",
        }
    }

    /// The top candidate for a checker play.
    pub fn best_move(&self) -> Option<&CandidateMove> {
        match self {
            Self::Play { moves } => moves.first(),
            _ => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { code } => write!(f, "error {code}"),
            Self::Play { moves } => match moves.first() {
                Some(best) => write!(f, "play {}", best.notation),
                None => f.write_str("play (no legal move)"),
            },
            other => f.write_str(other.action_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_document() {
        let rec = Recommendation::from_value(&json!({"error": -3})).unwrap();
        assert_eq!(rec, Recommendation::Error { code: -3 });
        assert_eq!(rec.to_string(), "error -3");
    }

    #[test]
    fn test_cube_document() {
        let doc = json!({
            "action": "double",
            "data": {"cd": 2, "equity": [0.6123, 0.8412, 1.0, 0.8412]}
        });
        let rec = Recommendation::from_value(&doc).unwrap();
        match rec {
            Recommendation::Cube { action, decision, equity } => {
                assert_eq!(action, CubeAction::Double);
                assert_eq!(decision, 2);
                assert!((equity.take - 0.8412).abs() < 1e-9);
                assert!((equity.drop - 1.0).abs() < 1e-9);
            }
            other => panic!("expected cube decision, got {other:?}"),
        }
    }

    #[test]
    fn test_resignation_documents() {
        let rec = Recommendation::from_value(&json!({"action": "reject resignation"})).unwrap();
        assert_eq!(
            rec,
            Recommendation::Simple { action: SimpleAction::RejectResignation }
        );
        assert_eq!(rec.action_name(), "reject resignation");
    }

    #[test]
    fn test_play_document() {
        let doc = json!({
            "action": "play",
            "data": [
                {"move": "24/18 13/11", "equity": [0.0412, 0.0388],
                 "eval": [0.5312, 0.1501, 0.0071, 0.1288, 0.0052]},
                {"move": "13/11 13/7", "equity": [0.0101, 0.0097],
                 "eval": [0.5204, 0.1433, 0.0066, 0.1302, 0.0055]}
            ]
        });
        let rec = Recommendation::from_value(&doc).unwrap();
        let best = rec.best_move().unwrap();
        assert_eq!(best.notation, "24/18 13/11");
        assert!((best.cubeless_equity - 0.0388).abs() < 1e-9);
        assert!((best.probabilities.lose() - 0.4688).abs() < 1e-9);
        assert_eq!(rec.to_string(), "play 24/18 13/11");

        match rec {
            Recommendation::Play { moves } => assert_eq!(moves.len(), 2),
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_shapes() {
        assert!(Recommendation::from_value(&json!([1, 2, 3])).is_none());
        assert!(Recommendation::from_value(&json!({"action": "resign"})).is_none());
        // Cube actions without data are not recognized.
        assert!(Recommendation::from_value(&json!({"action": "roll"})).is_none());
        assert!(Recommendation::from_value(&json!({
            "action": "play",
            "data": [{"move": "8/5 6/5", "equity": [0.1]}]
        }))
        .is_none());
    }
}
