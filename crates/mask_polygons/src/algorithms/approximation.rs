use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use crate::{traits::ContourApproximator, types::Contour};

/// How traced boundary pixels are reduced before they become shape points.
///
/// `Simple` is chain-code compression with zero tolerance: a point is dropped
/// only when the step into it and the step out of it have the same
/// 8-neighbour direction, so horizontal, vertical and diagonal runs collapse
/// to their end points and no boundary pixel moves.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContourApproximation {
    /// Keep every traced boundary pixel
    None,
    /// Collapse straight runs to their end points
    #[default]
    Simple,
}

impl ContourApproximator for ContourApproximation {
    fn approximate(&self, contour: &[[u32; 2]]) -> Contour {
        match self {
            Self::None => contour.to_vec(),
            Self::Simple => compress_chain(contour),
        }
    }
}

fn step(from: [u32; 2], to: [u32; 2]) -> (i64, i64) {
    let dx = i64::from(to[0]) - i64::from(from[0]);
    let dy = i64::from(to[1]) - i64::from(from[1]);
    (dx.signum(), dy.signum())
}

fn compress_chain(contour: &[[u32; 2]]) -> Contour {
    let n = contour.len();
    if n < 3 {
        return contour.to_vec();
    }

    let kept: Contour = (0..n)
        .filter(|&i| {
            let prev = contour[(i + n - 1) % n];
            let next = contour[(i + 1) % n];
            step(prev, contour[i]) != step(contour[i], next)
        })
        .map(|i| contour[i])
        .collect();

    // Only reachable when every point coincides
    if kept.is_empty() {
        return vec![contour[0]];
    }
    kept
}
