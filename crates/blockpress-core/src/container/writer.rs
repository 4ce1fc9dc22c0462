use std::fmt::Display;
use std::io::Write;

use bitstream_io::{BigEndian, BitWrite, BitWriter};

use super::{
    AC_CODE_LENGTH_BITS, BLOCKS_COUNT_BITS, CATEGORY_BITS, DC_CODE_LENGTH_BITS, RUN_LENGTH_BITS,
    SIZE_BITS, TABLE_SIZE_BITS,
};
use crate::bits::{bits_required, int_to_binstr, uint_to_binstr, BitString};
use crate::coefficients::BlockCoefficients;
use crate::error::{CodecError, Result};
use crate::huffman::HuffmanTable;
use crate::quantize::ChannelRole;
use crate::rle::{run_length_encode, RunSize};
use crate::tables::{CodeTables, SymbolClass};

/// Serializes tables and blocks into a byte sink.
///
/// Call order is [`write_tables`](Self::write_tables),
/// [`write_block_count`](Self::write_block_count), one
/// [`write_block`](Self::write_block) per block and finally
/// [`finish`](Self::finish) to flush the padded last byte.
pub struct ContainerWriter<W: Write> {
    bits: BitWriter<W, BigEndian>,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            bits: BitWriter::endian(writer, BigEndian),
        }
    }

    /// Writes `value` as an unsigned field of exactly `width` bits.
    fn write_field(&mut self, value: u64, width: u32) -> Result<()> {
        let field = uint_to_binstr(value, width as u8)?;
        self.write_bits(field)
    }

    fn write_bits(&mut self, bits: BitString) -> Result<()> {
        if !bits.is_empty() {
            self.bits.write(bits.len() as u32, bits.bits())?;
        }
        Ok(())
    }

    fn write_code<S: Copy + Ord + Display>(
        &mut self,
        table: &HuffmanTable<S>,
        class: SymbolClass,
        symbol: S,
    ) -> Result<()> {
        let code = table.get(&symbol).ok_or_else(|| CodecError::MissingSymbol {
            symbol: symbol.to_string(),
            class: class.name(),
        })?;
        log::trace!("{} {} -> {}", class, symbol, code);
        self.write_bits(code)
    }

    pub fn write_dc_table(&mut self, table: &HuffmanTable<u8>) -> Result<()> {
        self.write_field(table.len() as u64, TABLE_SIZE_BITS)?;
        for (category, code) in table.iter() {
            self.write_field(category as u64, CATEGORY_BITS)?;
            self.write_field(code.len() as u64, DC_CODE_LENGTH_BITS)?;
            self.write_bits(code)?;
        }
        Ok(())
    }

    pub fn write_ac_table(&mut self, table: &HuffmanTable<RunSize>) -> Result<()> {
        self.write_field(table.len() as u64, TABLE_SIZE_BITS)?;
        for (symbol, code) in table.iter() {
            self.write_field(symbol.run as u64, RUN_LENGTH_BITS)?;
            self.write_field(symbol.size as u64, SIZE_BITS)?;
            self.write_field(code.len() as u64, AC_CODE_LENGTH_BITS)?;
            self.write_bits(code)?;
        }
        Ok(())
    }

    /// Writes the four table sections in container order.
    pub fn write_tables(&mut self, tables: &CodeTables) -> Result<()> {
        for class in SymbolClass::ALL {
            let role = class.role();
            if class.is_dc() {
                self.write_dc_table(tables.dc(role))?;
            } else {
                self.write_ac_table(tables.ac(role))?;
            }
            log::debug!("wrote {} table with {} entries", class, tables.entry_count(class));
        }
        Ok(())
    }

    pub fn write_block_count(&mut self, count: usize) -> Result<()> {
        self.write_field(count as u64, BLOCKS_COUNT_BITS)
    }

    /// Writes all channels of one block.
    pub fn write_block(&mut self, block: &BlockCoefficients, tables: &CodeTables) -> Result<()> {
        for (channel, pair) in block.iter().enumerate() {
            let role = ChannelRole::of_channel(channel);

            let category = bits_required(pair.dc);
            self.write_code(tables.dc(role), SymbolClass::dc(role), category)?;
            self.write_bits(int_to_binstr(pair.dc))?;

            let encoded = run_length_encode(&pair.ac)?;
            for (&symbol, &value) in encoded.iter() {
                self.write_code(tables.ac(role), SymbolClass::ac(role), symbol)?;
                self.write_bits(value)?;
            }
        }
        Ok(())
    }

    /// Pads the last byte with zeros and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.bits.byte_align()?;
        let mut writer = self.bits.into_writer();
        writer.flush()?;
        Ok(writer)
    }
}
