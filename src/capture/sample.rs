//! Sensor frame data delivered to the capture loop.

use serde::{Deserialize, Serialize};

/// A fingertip position in millimetres, sensor-relative.
///
/// `x` grows to the right, `y` upward away from the sensor, `z` toward the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Vec3) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Finger {
    pub kind: FingerKind,
    pub tip: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    #[serde(default)]
    pub fingers: Vec<Finger>,
}

impl Hand {
    /// Tip of the first finger of `kind`, if tracked with finite coordinates.
    pub fn tip(&self, kind: FingerKind) -> Option<Vec3> {
        self.fingers
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.tip)
            .filter(Vec3::is_finite)
    }
}

/// Gesture kinds reported by the sensor. Only `Swipe` has an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Swipe,
    Circle,
    KeyTap,
    ScreenTap,
}

/// Everything the sensor reports for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Monotonically increasing frame identifier
    pub id: u64,
    #[serde(default)]
    pub hands: Vec<Hand>,
    #[serde(default)]
    pub gestures: Vec<GestureKind>,
}

impl SensorFrame {
    /// The first hand that carries both an index and a middle fingertip.
    pub fn sample(&self) -> Option<HandSample> {
        self.hands.iter().find_map(HandSample::from_hand)
    }
}

/// Index and middle fingertip positions of one hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub index: Vec3,
    pub middle: Vec3,
}

impl HandSample {
    pub fn new(index: Vec3, middle: Vec3) -> Self {
        Self { index, middle }
    }

    pub fn from_hand(hand: &Hand) -> Option<Self> {
        Some(Self {
            index: hand.tip(FingerKind::Index)?,
            middle: hand.tip(FingerKind::Middle)?,
        })
    }

    /// Euclidean distance between the two fingertips.
    pub fn separation(&self) -> f32 {
        self.index.distance(&self.middle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(index: Vec3, middle: Vec3) -> Hand {
        Hand {
            fingers: vec![
                Finger { kind: FingerKind::Thumb, tip: Vec3::new(-40.0, 100.0, 0.0) },
                Finger { kind: FingerKind::Index, tip: index },
                Finger { kind: FingerKind::Middle, tip: middle },
            ],
        }
    }

    #[test]
    fn test_separation_is_3d_distance() {
        let sample = HandSample::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 12.0));
        assert_eq!(sample.separation(), 13.0);
    }

    #[test]
    fn test_sample_requires_both_fingers() {
        let frame = SensorFrame {
            id: 1,
            hands: vec![Hand {
                fingers: vec![Finger { kind: FingerKind::Index, tip: Vec3::new(0.0, 100.0, 0.0) }],
            }],
            gestures: vec![],
        };
        assert!(frame.sample().is_none());
    }

    #[test]
    fn test_sample_picks_first_complete_hand() {
        let incomplete = Hand { fingers: vec![] };
        let complete = hand(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let frame = SensorFrame { id: 1, hands: vec![incomplete, complete], gestures: vec![] };
        let sample = frame.sample().unwrap();
        assert_eq!(sample.index, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_non_finite_tip_is_ignored() {
        let frame = SensorFrame {
            id: 1,
            hands: vec![hand(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0))],
            gestures: vec![],
        };
        assert!(frame.sample().is_none());
    }

    #[test]
    fn test_frame_deserializes_from_json() {
        let json = r#"{"id": 7, "hands": [{"fingers": [
            {"kind": "index", "tip": {"x": 1.0, "y": 120.0, "z": 0.0}},
            {"kind": "middle", "tip": {"x": 11.0, "y": 120.0, "z": 0.0}}
        ]}], "gestures": ["swipe", "key_tap"]}"#;
        let frame: SensorFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.id, 7);
        assert_eq!(frame.gestures, vec![GestureKind::Swipe, GestureKind::KeyTap]);
        assert_eq!(frame.sample().unwrap().separation(), 10.0);
    }

    #[test]
    fn test_frame_defaults_missing_fields() {
        let frame: SensorFrame = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(frame.hands.is_empty());
        assert!(frame.gestures.is_empty());
        assert!(frame.sample().is_none());
    }
}
