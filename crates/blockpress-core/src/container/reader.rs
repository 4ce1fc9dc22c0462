use std::fmt::Display;
use std::io::Read;

use bitstream_io::{BigEndian, BitRead, BitReader};

use super::{
    AC_CODE_LENGTH_BITS, BLOCKS_COUNT_BITS, CATEGORY_BITS, DC_CODE_LENGTH_BITS, RUN_LENGTH_BITS,
    SIZE_BITS, TABLE_SIZE_BITS,
};
use crate::bits::{binstr_to_int, uint_to_binstr, BitString, MAX_BITS};
use crate::coefficients::{BlockCoefficients, CoefficientPair, CHANNELS};
use crate::error::{CodecError, Result};
use crate::huffman::{HuffmanTable, PrefixDecoder};
use crate::quantize::ChannelRole;
use crate::rle::{run_length_decode, AcSource, RunSize};
use crate::tables::{CodeTables, DecodeTables, SymbolClass};

/// Owns the bit cursor over a container.
///
/// Fields are consumed strictly in stream order. After an error the cursor
/// position is undefined and the reader should be dropped.
pub struct ContainerReader<R: Read> {
    bits: BitReader<R, BigEndian>,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bits: BitReader::endian(reader, BigEndian),
        }
    }

    fn read_field(&mut self, width: u32) -> Result<u64> {
        Ok(self.bits.read::<u64>(width)?)
    }

    /// Reads a code length field followed by that many code bits.
    fn read_code(&mut self, length_bits: u32) -> Result<BitString> {
        let len = self.read_field(length_bits)?;
        if len == 0 {
            return Err(CodecError::CorruptTable {
                reason: "code of length 0".to_string(),
            });
        }
        if len > MAX_BITS as u64 {
            return Err(CodecError::CodeTooLong { len: len as usize });
        }
        let bits = self.read_field(len as u32)?;
        uint_to_binstr(bits, len as u8)
    }

    fn read_table<S, F>(&mut self, mut read_entry: F) -> Result<HuffmanTable<S>>
    where
        S: Copy + Ord + Display,
        F: FnMut(&mut Self) -> Result<(S, BitString)>,
    {
        let count = self.read_field(TABLE_SIZE_BITS)?;
        let mut table = HuffmanTable::new();
        for _ in 0..count {
            let (symbol, code) = read_entry(self)?;
            if table.get(&symbol).is_some() {
                return Err(CodecError::CorruptTable {
                    reason: format!("symbol {} listed twice", symbol),
                });
            }
            table.insert(symbol, code);
        }
        Ok(table)
    }

    pub fn read_dc_table(&mut self) -> Result<HuffmanTable<u8>> {
        self.read_table(|reader| {
            let category = reader.read_field(CATEGORY_BITS)? as u8;
            let code = reader.read_code(DC_CODE_LENGTH_BITS)?;
            Ok((category, code))
        })
    }

    pub fn read_ac_table(&mut self) -> Result<HuffmanTable<RunSize>> {
        self.read_table(|reader| {
            let run = reader.read_field(RUN_LENGTH_BITS)? as u8;
            let size = reader.read_field(SIZE_BITS)? as u8;
            let code = reader.read_code(AC_CODE_LENGTH_BITS)?;
            Ok((RunSize::new(run, size), code))
        })
    }

    /// Reads the four table sections in container order.
    pub fn read_tables(&mut self) -> Result<CodeTables> {
        let mut tables = CodeTables::default();
        for class in SymbolClass::ALL {
            match class {
                SymbolClass::DcLuma => tables.dc_luma = self.read_dc_table()?,
                SymbolClass::AcLuma => tables.ac_luma = self.read_ac_table()?,
                SymbolClass::DcChroma => tables.dc_chroma = self.read_dc_table()?,
                SymbolClass::AcChroma => tables.ac_chroma = self.read_ac_table()?,
            }
            log::debug!("read {} table with {} entries", class, tables.entry_count(class));
        }
        Ok(tables)
    }

    pub fn read_block_count(&mut self) -> Result<u32> {
        Ok(self.read_field(BLOCKS_COUNT_BITS)? as u32)
    }

    /// Pulls bits one at a time until they match a code of `decoder`.
    pub fn read_huffman_code<S: Copy + Ord>(&mut self, decoder: &PrefixDecoder<S>) -> Result<S> {
        let bits = &mut self.bits;
        decoder.decode_with(|| Ok(bits.read_bit()?))
    }

    /// Reads a signed value of `width` bits, a width of 0 reads nothing.
    pub fn read_int(&mut self, width: u8) -> Result<i32> {
        if width == 0 {
            return Ok(0);
        }
        let pattern = self.read_field(width as u32)?;
        Ok(binstr_to_int(uint_to_binstr(pattern, width)?))
    }

    /// Reads all channels of one block.
    pub fn read_block(&mut self, tables: &DecodeTables) -> Result<BlockCoefficients> {
        let mut block = [CoefficientPair::default(); CHANNELS];
        for (channel, pair) in block.iter_mut().enumerate() {
            let role = ChannelRole::of_channel(channel);

            let category = self.read_huffman_code(tables.dc(role))?;
            pair.dc = self.read_int(category)?;
            pair.ac = run_length_decode(&mut AcStream {
                reader: self,
                decoder: tables.ac(role),
            })?;
        }
        Ok(block)
    }
}

/// AC symbols of one channel, decoded with that channel's table.
struct AcStream<'a, R: Read> {
    reader: &'a mut ContainerReader<R>,
    decoder: &'a PrefixDecoder<RunSize>,
}

impl<R: Read> AcSource for AcStream<'_, R> {
    fn next_symbol(&mut self) -> Result<RunSize> {
        self.reader.read_huffman_code(self.decoder)
    }

    fn read_value(&mut self, size: u8) -> Result<i32> {
        self.reader.read_int(size)
    }
}
