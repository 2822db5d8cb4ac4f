//! Rectangle reprojection.

use tracing::debug;

use crate::transform::CoordTransformer;
use crate::ProjectionError;

/// Points inserted along each edge between corners.
pub const DEFAULT_DENSIFY_POINTS: usize = 21;

/// Reproject a rectangle and return the envelope `(min_x, min_y, max_x, max_y)`
/// of its image in the target system.
///
/// Edges are densified so curved projected boundaries are enclosed. Points that
/// fail to transform are skipped; the call fails only if none succeed.
pub fn transform_bounds(
    transformer: &CoordTransformer,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    densify_points: usize,
) -> Result<(f64, f64, f64, f64), ProjectionError> {
    let steps = densify_points + 1;
    let mut envelope = (
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    let mut transformed = 0usize;
    let mut last_error = None;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = min_x + (max_x - min_x) * t;
        let y = min_y + (max_y - min_y) * t;
        let edge_points = [(x, min_y), (x, max_y), (min_x, y), (max_x, y)];

        for (px, py) in edge_points {
            match transformer.transform(px, py) {
                Ok((ox, oy)) => {
                    envelope.0 = envelope.0.min(ox);
                    envelope.1 = envelope.1.min(oy);
                    envelope.2 = envelope.2.max(ox);
                    envelope.3 = envelope.3.max(oy);
                    transformed += 1;
                }
                Err(e) => last_error = Some(e),
            }
        }
    }

    if transformed == 0 {
        return Err(last_error.unwrap_or_else(|| {
            ProjectionError::TransformFailed("no edge points to transform".to_string())
        }));
    }

    debug!(
        source = %transformer.source(),
        target = %transformer.target(),
        transformed,
        "Reprojected bounds"
    );

    Ok(envelope)
}
