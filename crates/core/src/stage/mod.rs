use serde::{Deserialize, Serialize};

/// World-space position of an actor on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Blends `self` towards `other`. `t == 0` returns `self` and `t == 1`
    /// returns `other` bit for bit.
    pub fn lerp(self, other: Vec3, t: f64) -> Vec3 {
        let mix = |a: f32, b: f32| (f64::from(a) * (1.0 - t) + f64::from(b) * t) as f32;
        Vec3 {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            z: mix(self.z, other.z),
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(value: Vec3) -> Self {
        [value.x, value.y, value.z]
    }
}

/// Point on the stage floor. Persisted as `[x, 0, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct StagePoint {
    pub x: f32,
    pub z: f32,
}

impl StagePoint {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Builds a point from a picked floor coordinate, rounded to hundredths.
    pub fn from_pick(x: f32, z: f32) -> Self {
        Self {
            x: round_hundredths(x),
            z: round_hundredths(z),
        }
    }

    pub fn to_world(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}

impl From<[f32; 3]> for StagePoint {
    fn from([x, _, z]: [f32; 3]) -> Self {
        Self { x, z }
    }
}

impl From<StagePoint> for [f32; 3] {
    fn from(value: StagePoint) -> Self {
        [value.x, 0.0, value.z]
    }
}

fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Rectangular stage floor centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageBounds {
    pub width: f32,
    pub depth: f32,
}

impl StageBounds {
    pub fn new(width: f32, depth: f32) -> Self {
        Self {
            width: width.abs(),
            depth: depth.abs(),
        }
    }

    pub fn contains(&self, point: StagePoint) -> bool {
        point.x.abs() <= self.width / 2.0 && point.z.abs() <= self.depth / 2.0
    }

    /// Pulls a point back onto the floor.
    pub fn clamp(&self, point: StagePoint) -> StagePoint {
        let half_w = self.width / 2.0;
        let half_d = self.depth / 2.0;
        StagePoint::new(point.x.clamp(-half_w, half_w), point.z.clamp(-half_d, half_d))
    }
}

impl Default for StageBounds {
    fn default() -> Self {
        Self::new(800.0, 306.0)
    }
}

/// A dancer slot on the stage and where it stands before playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DancerSpawn {
    pub id: String,
    pub position: Vec3,
}

impl DancerSpawn {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// The five-dancer formation: three in the back row, two in front.
pub fn default_roster() -> Vec<DancerSpawn> {
    vec![
        DancerSpawn::new("dancer1", Vec3::new(-25.0, 0.0, -2.0)),
        DancerSpawn::new("dancer2", Vec3::new(-5.0, 0.0, -2.0)),
        DancerSpawn::new("dancer3", Vec3::new(15.0, 0.0, -2.0)),
        DancerSpawn::new("dancer4", Vec3::new(-15.0, 0.0, 5.0)),
        DancerSpawn::new("dancer5", Vec3::new(5.0, 0.0, 5.0)),
    ]
}
