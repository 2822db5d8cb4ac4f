//! Fixed instructions sent to the remote services.

use crate::Location;

/// Hypsometric tinting instruction for the style-transfer model.
pub const HYPSOMETRIC_TINT: &str = "Enhance this topographic map with vivid hypsometric tinting:

- Apply elevation-based coloring ONLY to the land terrain areas:
  - Coastal lowlands and beaches: pale cream, soft mint greens
  - Low elevations: light greens, yellow-greens
  - Mid elevations: golden yellows, warm ochres, tans
  - High elevations: deep rusty browns, burnt sienna, terra cotta reds
  - Highest peaks: dark reddish-brown (#8B4513), with snow-capped areas in white

- Ocean: deep rich blue with subtle depth gradient (darker = deeper)
- Shallow water/reefs: lighter turquoise blue

- KEEP EXACTLY AS-IS:
  - All text labels and place names
  - Map borders and margins
  - Legend and scale bar
  - Grid lines and coordinates

- Do NOT add shadows or 3D hillshading
- Maintain exact same dimensions and layout

Style reference: vintage raised relief map with rich, saturated terrain colors";

/// Instruction for deriving a grayscale heightmap from a map image.
pub const HEIGHTMAP: &str = "Generate a pure grayscale heightmap from this topographic map.

Rules:
- Pure black (#000000) for all water bodies (ocean, lakes, rivers)
- Pure black for map borders, legends, titles, margins, and any text
- Only land areas have grayscale values
- White = highest peaks, dark gray = lowest land elevations
- Smooth gradients based on elevation contours and relief shading
- Output should be the same dimensions as input
- No labels, no artifacts, just clean elevation data

Return ONLY the heightmap image.";

/// Instruction for reading the bounding box off a map image.
pub const BOUNDS: &str = r#"Analyze this topographic map and extract the geographic bounding box.

Look for:
- Latitude/longitude markings on the map borders
- Graticule lines (grid lines showing coordinates)
- Any coordinate text visible on the map

Return ONLY a JSON object in this exact format, no other text:
{"north": 22.5, "south": 21.5, "east": -159.0, "west": -160.0}

Use decimal degrees. West longitudes are negative. Be as precise as possible."#;

/// Flyover narration request for a position and the features in view.
pub fn narration(location: &Location, features: &[String]) -> String {
    let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string());
    let visible = if features.is_empty() {
        "general terrain".to_string()
    } else {
        features.join(", ")
    };

    format!(
        "You are a knowledgeable tour guide narrating a scenic flyover.

Current position: latitude {}, longitude {}
Elevation: {}m
Visible features: {}

Generate a brief, engaging narration (1-2 sentences) about what the viewer is seeing.
Focus on interesting geographic, historical, or natural facts.
Be conversational and enthusiastic but not over the top.",
        fmt(location.lat),
        fmt(location.lon),
        fmt(location.elevation),
        visible
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narration_lists_features() {
        let location = Location {
            lat: Some(22.07),
            lon: Some(-159.5),
            elevation: Some(1598.0),
        };
        let prompt = narration(&location, &["Waimea Canyon".to_string(), "Na Pali".to_string()]);
        assert!(prompt.contains("latitude 22.07"));
        assert!(prompt.contains("Waimea Canyon, Na Pali"));
    }

    #[test]
    fn test_narration_defaults() {
        let prompt = narration(&Location::default(), &[]);
        assert!(prompt.contains("latitude unknown"));
        assert!(prompt.contains("general terrain"));
    }
}
