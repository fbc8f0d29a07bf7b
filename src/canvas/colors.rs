use std::sync::OnceLock;

/// A 1D colormap: 256-entry byte → RGB lookup table.
pub struct Colormap {
    lut: [[u8; 3]; 256],
}

impl Colormap {
    /// Look up the color for a normalized intensity.
    #[inline]
    pub fn apply(&self, value: u8) -> [u8; 3] {
        self.lut[value as usize]
    }

    pub fn lut(&self) -> &[[u8; 3]; 256] {
        &self.lut
    }
}

/// The viridis palette sampled at `i / 255` for every byte value.
///
/// Built once from the published table shipped with `colorous`.
pub fn viridis() -> &'static Colormap {
    static VIRIDIS: OnceLock<Colormap> = OnceLock::new();
    VIRIDIS.get_or_init(|| {
        let mut lut = [[0u8; 3]; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            let c = colorous::VIRIDIS.eval_continuous(i as f64 / 255.0);
            *entry = [c.r, c.g, c.b];
        }
        Colormap { lut }
    })
}
