//! Per-channel 8-bit tone curve.
//!
//! A filter LUT is 768 integers: three 256-entry curves for red, green and
//! blue, concatenated in that order. Entries are stored as read from the
//! filter file (possibly negative or above 255); they are clamped only when
//! the table is applied to pixel data.

use crate::{LutError, LutResult};

/// Entries per channel.
pub const CHANNEL_LEN: usize = 256;

/// Total number of entries in a normalized table.
pub const LUT_LEN: usize = CHANNEL_LEN * 3;

/// Color channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red curve (entries 0..256).
    Red,
    /// Green curve (entries 256..512).
    Green,
    /// Blue curve (entries 512..768).
    Blue,
}

impl Channel {
    /// All channels in table order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of the channel in RGB order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    #[inline]
    fn offset(self) -> usize {
        self.index() * CHANNEL_LEN
    }
}

/// A normalized 3x256 lookup table.
///
/// The length invariant (`LUT_LEN` entries) holds for every value of this
/// type regardless of how irregular the source file was.
///
/// # Example
///
/// ```rust
/// use filmlab_lut::{Channel, Lut};
///
/// let lut = Lut::identity();
/// assert_eq!(lut.lookup(Channel::Green, 200), 200);
/// assert!(lut.is_identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    table: Vec<i32>,
}

impl Lut {
    /// Creates the pass-through table (`R[i] = G[i] = B[i] = i`).
    pub fn identity() -> Self {
        Self::from_fn(|_, i| i as i32)
    }

    /// Builds a table by evaluating `f` for every channel and input value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use filmlab_lut::{Channel, Lut};
    ///
    /// // Invert blue only
    /// let lut = Lut::from_fn(|ch, i| match ch {
    ///     Channel::Blue => 255 - i as i32,
    ///     _ => i as i32,
    /// });
    /// assert_eq!(lut.lookup(Channel::Blue, 0), 255);
    /// ```
    pub fn from_fn<F: FnMut(Channel, u8) -> i32>(mut f: F) -> Self {
        let mut table = Vec::with_capacity(LUT_LEN);
        for channel in Channel::ALL {
            for i in 0..CHANNEL_LEN {
                table.push(f(channel, i as u8));
            }
        }
        Self { table }
    }

    /// Creates a table from three explicit 256-entry curves.
    pub fn from_channels(r: &[i32], g: &[i32], b: &[i32]) -> LutResult<Self> {
        for (name, curve) in [("red", r), ("green", g), ("blue", b)] {
            if curve.len() != CHANNEL_LEN {
                return Err(LutError::InvalidSize(format!(
                    "{} curve has {} entries, expected {}",
                    name,
                    curve.len(),
                    CHANNEL_LEN
                )));
            }
        }
        let mut table = Vec::with_capacity(LUT_LEN);
        table.extend_from_slice(r);
        table.extend_from_slice(g);
        table.extend_from_slice(b);
        Ok(Self { table })
    }

    /// Creates per-channel power curves.
    ///
    /// Each channel maps `i` to `255 * (i / 255) ^ exponent`, so exponents
    /// below 1.0 lift the channel and exponents above 1.0 darken it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use filmlab_lut::{Channel, Lut};
    ///
    /// let warm = Lut::gamma([0.9, 1.0, 1.15]);
    /// assert!(warm.lookup(Channel::Red, 128) > 128);
    /// assert!(warm.lookup(Channel::Blue, 128) < 128);
    /// ```
    pub fn gamma(exponents: [f32; 3]) -> Self {
        Self::from_fn(|channel, i| {
            let t = i as f32 / 255.0;
            (t.powf(exponents[channel.index()]) * 255.0).round() as i32
        })
    }

    /// Normalizes a flat token stream into a 768-entry table.
    ///
    /// `data_lines` is the number of source lines the values came from.
    ///
    /// - a single line of exactly 256 values is a grayscale curve and is
    ///   repeated for all three channels
    /// - shorter streams are padded by repeating the last value
    /// - longer streams are truncated
    /// - an empty stream is [`LutError::NoData`]
    pub fn from_values(mut values: Vec<i32>, data_lines: usize) -> LutResult<Self> {
        let Some(&last) = values.last() else {
            return Err(LutError::NoData);
        };

        if data_lines == 1 && values.len() == CHANNEL_LEN {
            values.reserve(CHANNEL_LEN * 2);
            values.extend_from_within(..CHANNEL_LEN);
            values.extend_from_within(..CHANNEL_LEN);
        } else if values.len() < LUT_LEN {
            values.resize(LUT_LEN, last);
        } else {
            values.truncate(LUT_LEN);
        }

        Ok(Self { table: values })
    }

    /// Returns the raw entries of one channel.
    #[inline]
    pub fn channel(&self, channel: Channel) -> &[i32] {
        let start = channel.offset();
        &self.table[start..start + CHANNEL_LEN]
    }

    /// Returns all 768 raw entries.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.table
    }

    /// Looks up one value, clamping the entry to the 8-bit range.
    #[inline]
    pub fn lookup(&self, channel: Channel, value: u8) -> u8 {
        self.table[channel.offset() + value as usize].clamp(0, 255) as u8
    }

    /// Remaps an RGB triple.
    #[inline]
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        [
            self.lookup(Channel::Red, rgb[0]),
            self.lookup(Channel::Green, rgb[1]),
            self.lookup(Channel::Blue, rgb[2]),
        ]
    }

    /// Returns the table clamped to bytes, one array per channel.
    ///
    /// Hot loops index this instead of calling [`Lut::lookup`] per sample.
    pub fn to_bytes(&self) -> [[u8; CHANNEL_LEN]; 3] {
        let mut out = [[0u8; CHANNEL_LEN]; 3];
        for channel in Channel::ALL {
            for (dst, &src) in out[channel.index()].iter_mut().zip(self.channel(channel)) {
                *dst = src.clamp(0, 255) as u8;
            }
        }
        out
    }

    /// Returns true if every channel maps each value to itself.
    pub fn is_identity(&self) -> bool {
        self.table
            .iter()
            .enumerate()
            .all(|(i, &v)| v == (i % CHANNEL_LEN) as i32)
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}
