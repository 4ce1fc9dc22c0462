//! The four code tables of an image and the symbol classes they belong to.

use std::fmt;

use crate::bits::bits_required;
use crate::coefficients::ImageCoefficients;
use crate::error::{CodecError, Result};
use crate::huffman::{Frequencies, HuffmanTable, PrefixDecoder};
use crate::quantize::ChannelRole;
use crate::rle::{run_length_encode, RunSize, MAX_SIZE};

/// Channel indices per role.
const LUMA_CHANNELS: [usize; 1] = [0];
const CHROMA_CHANNELS: [usize; 2] = [1, 2];

/// Class of symbols that share one Huffman table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    DcLuma,
    AcLuma,
    DcChroma,
    AcChroma,
}

impl SymbolClass {
    /// Order of the table sections in a container.
    pub const ALL: [SymbolClass; 4] = [
        SymbolClass::DcLuma,
        SymbolClass::AcLuma,
        SymbolClass::DcChroma,
        SymbolClass::AcChroma,
    ];

    pub fn dc(role: ChannelRole) -> Self {
        match role {
            ChannelRole::Luma => SymbolClass::DcLuma,
            ChannelRole::Chroma => SymbolClass::DcChroma,
        }
    }

    pub fn ac(role: ChannelRole) -> Self {
        match role {
            ChannelRole::Luma => SymbolClass::AcLuma,
            ChannelRole::Chroma => SymbolClass::AcChroma,
        }
    }

    #[inline]
    pub fn is_dc(&self) -> bool {
        matches!(self, SymbolClass::DcLuma | SymbolClass::DcChroma)
    }

    pub fn role(&self) -> ChannelRole {
        match self {
            SymbolClass::DcLuma | SymbolClass::AcLuma => ChannelRole::Luma,
            SymbolClass::DcChroma | SymbolClass::AcChroma => ChannelRole::Chroma,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SymbolClass::DcLuma => "dc_luma",
            SymbolClass::AcLuma => "ac_luma",
            SymbolClass::DcChroma => "dc_chroma",
            SymbolClass::AcChroma => "ac_chroma",
        }
    }
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn channels_of(role: ChannelRole) -> &'static [usize] {
    match role {
        ChannelRole::Luma => &LUMA_CHANNELS,
        ChannelRole::Chroma => &CHROMA_CHANNELS,
    }
}

/// Symbol counts of one image, one multiset per class.
#[derive(Debug, Clone, Default)]
pub struct SymbolStatistics {
    pub dc_luma: Frequencies<u8>,
    pub ac_luma: Frequencies<RunSize>,
    pub dc_chroma: Frequencies<u8>,
    pub ac_chroma: Frequencies<RunSize>,
}

impl SymbolStatistics {
    /// Counts DC categories and AC run/size symbols of every block.
    pub fn gather(coefficients: &ImageCoefficients) -> Result<Self> {
        let mut statistics = Self::default();

        for role in [ChannelRole::Luma, ChannelRole::Chroma] {
            let (dc, ac) = match role {
                ChannelRole::Luma => (&mut statistics.dc_luma, &mut statistics.ac_luma),
                ChannelRole::Chroma => (&mut statistics.dc_chroma, &mut statistics.ac_chroma),
            };

            for pair in coefficients.channels(channels_of(role)) {
                let category = bits_required(pair.dc);
                if category > MAX_SIZE {
                    return Err(CodecError::ValueTooWide {
                        value: pair.dc.unsigned_abs() as u64,
                        width: MAX_SIZE,
                    });
                }
                dc.add(category);
                ac.extend(run_length_encode(&pair.ac)?.symbols);
            }
        }

        Ok(statistics)
    }
}

/// The four code tables of an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTables {
    pub dc_luma: HuffmanTable<u8>,
    pub ac_luma: HuffmanTable<RunSize>,
    pub dc_chroma: HuffmanTable<u8>,
    pub ac_chroma: HuffmanTable<RunSize>,
}

impl CodeTables {
    pub fn from_statistics(statistics: &SymbolStatistics) -> Result<Self> {
        Ok(Self {
            dc_luma: HuffmanTable::from_frequencies(&statistics.dc_luma)?,
            ac_luma: HuffmanTable::from_frequencies(&statistics.ac_luma)?,
            dc_chroma: HuffmanTable::from_frequencies(&statistics.dc_chroma)?,
            ac_chroma: HuffmanTable::from_frequencies(&statistics.ac_chroma)?,
        })
    }

    /// Gathers statistics and builds all four tables.
    pub fn build(coefficients: &ImageCoefficients) -> Result<Self> {
        Self::from_statistics(&SymbolStatistics::gather(coefficients)?)
    }

    pub fn dc(&self, role: ChannelRole) -> &HuffmanTable<u8> {
        match role {
            ChannelRole::Luma => &self.dc_luma,
            ChannelRole::Chroma => &self.dc_chroma,
        }
    }

    pub fn ac(&self, role: ChannelRole) -> &HuffmanTable<RunSize> {
        match role {
            ChannelRole::Luma => &self.ac_luma,
            ChannelRole::Chroma => &self.ac_chroma,
        }
    }

    /// Number of entries of the table of `class`.
    pub fn entry_count(&self, class: SymbolClass) -> usize {
        match class {
            SymbolClass::DcLuma => self.dc_luma.len(),
            SymbolClass::AcLuma => self.ac_luma.len(),
            SymbolClass::DcChroma => self.dc_chroma.len(),
            SymbolClass::AcChroma => self.ac_chroma.len(),
        }
    }
}

/// Decode side counterpart of [`CodeTables`].
#[derive(Debug, Clone)]
pub struct DecodeTables {
    dc_luma: PrefixDecoder<u8>,
    ac_luma: PrefixDecoder<RunSize>,
    dc_chroma: PrefixDecoder<u8>,
    ac_chroma: PrefixDecoder<RunSize>,
}

impl DecodeTables {
    pub fn new(tables: &CodeTables) -> Result<Self> {
        Ok(Self {
            dc_luma: PrefixDecoder::from_table(&tables.dc_luma)?,
            ac_luma: PrefixDecoder::from_table(&tables.ac_luma)?,
            dc_chroma: PrefixDecoder::from_table(&tables.dc_chroma)?,
            ac_chroma: PrefixDecoder::from_table(&tables.ac_chroma)?,
        })
    }

    pub fn dc(&self, role: ChannelRole) -> &PrefixDecoder<u8> {
        match role {
            ChannelRole::Luma => &self.dc_luma,
            ChannelRole::Chroma => &self.dc_chroma,
        }
    }

    pub fn ac(&self, role: ChannelRole) -> &PrefixDecoder<RunSize> {
        match role {
            ChannelRole::Luma => &self.ac_luma,
            ChannelRole::Chroma => &self.ac_chroma,
        }
    }
}
