use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Bar colouring: highlight the largest category
// ---------------------------------------------------------------------------

/// Colour of the leading bar (`#90CAF9`).
pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x90, 0xCA, 0xF9);
/// Colour of every other bar (`#D3D3D3`).
pub const MUTED: Color32 = Color32::from_rgb(0xD3, 0xD3, 0xD3);

/// One colour per value: the first maximum gets [`HIGHLIGHT`], the rest
/// [`MUTED`].
pub fn highlight_max(values: &[u64]) -> Vec<Color32> {
    let leader = values
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
        .map(|(i, _)| i);

    (0..values.len())
        .map(|i| if Some(i) == leader { HIGHLIGHT } else { MUTED })
        .collect()
}
