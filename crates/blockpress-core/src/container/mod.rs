//! The compressed container: four code tables, a block count and the
//! Huffman coded blocks, packed MSB first without any further framing.
//!
//! ```text
//! for each table in dc_luma, ac_luma, dc_chroma, ac_chroma:
//!     entry count                       16 bits
//!     DC entry: category 4, length 4, code bits
//!     AC entry: run 4, size 4, length 8, code bits
//! block count                           32 bits
//! for each block, for each channel:
//!     DC category code, DC value bits
//!     AC (run, size) codes, each followed by its value bits
//! zero padding up to the next byte
//! ```

mod reader;
mod writer;

pub use reader::ContainerReader;
pub use writer::ContainerWriter;

pub const TABLE_SIZE_BITS: u32 = 16;
pub const CATEGORY_BITS: u32 = 4;
pub const DC_CODE_LENGTH_BITS: u32 = 4;
pub const RUN_LENGTH_BITS: u32 = 4;
pub const SIZE_BITS: u32 = 4;
pub const AC_CODE_LENGTH_BITS: u32 = 8;
pub const BLOCKS_COUNT_BITS: u32 = 32;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{uint_to_binstr, BitString};
    use crate::coefficients::{CoefficientPair, ImageCoefficients};
    use crate::error::CodecError;
    use crate::huffman::HuffmanTable;
    use crate::rle::{RunSize, AC_LEN};
    use crate::tables::{CodeTables, DecodeTables};
    use bitstream_io::{BigEndian, BitWrite, BitWriter};

    fn code(s: &str) -> BitString {
        s.chars()
            .fold(BitString::EMPTY, |acc, c| acc.with(c == '1').unwrap())
    }

    fn render(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:08b}", b)).collect()
    }

    fn minimal_tables() -> CodeTables {
        let mut dc = HuffmanTable::new();
        dc.insert(0u8, code("0"));
        let mut ac = HuffmanTable::new();
        ac.insert(RunSize::EOB, code("0"));
        CodeTables {
            dc_luma: dc.clone(),
            ac_luma: ac.clone(),
            dc_chroma: dc,
            ac_chroma: ac,
        }
    }

    fn encode(tables: &CodeTables, image: &ImageCoefficients) -> Vec<u8> {
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_tables(tables).unwrap();
        writer.write_block_count(image.len()).unwrap();
        for block in image.blocks() {
            writer.write_block(block, tables).unwrap();
        }
        writer.finish().unwrap()
    }

    fn decode(bytes: &[u8]) -> (CodeTables, ImageCoefficients) {
        let mut reader = ContainerReader::new(bytes);
        let tables = reader.read_tables().unwrap();
        let decode_tables = DecodeTables::new(&tables).unwrap();
        let count = reader.read_block_count().unwrap();
        let image = (0..count)
            .map(|_| reader.read_block(&decode_tables).unwrap())
            .collect();
        (tables, image)
    }

    fn sample_image() -> ImageCoefficients {
        (0..12)
            .map(|n: i32| {
                let mut ac = [0; AC_LEN];
                ac[0] = n - 6;
                ac[(n as usize * 5) % AC_LEN] = 3 * n + 1;
                ac[AC_LEN - 1] = if n % 3 == 0 { -1 } else { 0 };
                [
                    CoefficientPair::new(40 * n - 200, ac),
                    CoefficientPair::new(-n, [0; AC_LEN]),
                    CoefficientPair::new(n % 2, ac.map(|v| v / 2)),
                ]
            })
            .collect()
    }

    #[test]
    fn test_exact_layout_of_minimal_container() {
        let image: ImageCoefficients =
            std::iter::once([CoefficientPair::default(); 3]).collect();
        let bytes = encode(&minimal_tables(), &image);

        let dc_table = format!("{:016b}{}{}{}", 1, "0000", "0001", "0");
        let ac_table = format!("{:016b}{}{}{}{}", 1, "0000", "0000", "00000001", "0");
        let mut expected = format!(
            "{dc}{ac}{dc}{ac}{:032b}{}",
            1,
            "00".repeat(3),
            dc = dc_table,
            ac = ac_table
        );
        assert_eq!(expected.len(), 154);
        expected.push_str("000000");

        assert_eq!(bytes.len(), 20);
        assert_eq!(render(&bytes), expected);
    }

    #[test]
    fn test_value_bits_follow_their_codes() {
        // one luma block with DC = -3 and a single AC value 2
        let mut tables = minimal_tables();
        tables.dc_luma.insert(2, code("1"));
        tables.ac_luma.insert(RunSize::new(1, 2), code("1"));

        let mut ac = [0; AC_LEN];
        ac[1] = 2;
        let block = [
            CoefficientPair::new(-3, ac),
            CoefficientPair::default(),
            CoefficientPair::default(),
        ];

        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_block(&block, &tables).unwrap();
        let bytes = writer.finish().unwrap();

        // dc code, -3 as "00", (1,2) code, 2 as "10", eob, then chroma
        assert_eq!(bytes.len(), 2);
        assert_eq!(render(&bytes), format!("{}{}{}", "1001100", "0000", "00000"));
    }

    #[test]
    fn test_roundtrip_of_built_tables() {
        let image = sample_image();
        let tables = CodeTables::build(&image).unwrap();
        let bytes = encode(&tables, &image);

        let (read_tables, read_image) = decode(&bytes);
        assert_eq!(read_tables, tables);
        assert_eq!(read_image, image);
    }

    #[test]
    fn test_empty_image() {
        let image = ImageCoefficients::new();
        let tables = CodeTables::build(&image).unwrap();
        let bytes = encode(&tables, &image);
        // four empty tables and the block count
        assert_eq!(bytes.len(), 12);

        let (read_tables, read_image) = decode(&bytes);
        assert_eq!(read_tables, tables);
        assert!(read_image.is_empty());
    }

    #[test]
    fn test_missing_symbol() {
        let mut ac = [0; AC_LEN];
        ac[0] = 7;
        let block = [CoefficientPair::new(0, ac); 3];

        let mut writer = ContainerWriter::new(Vec::new());
        let result = writer.write_block(&block, &minimal_tables());
        assert!(matches!(
            result,
            Err(CodecError::MissingSymbol { class: "ac_luma", .. })
        ));
    }

    #[test]
    fn test_dc_code_longer_than_length_field() {
        let mut tables = minimal_tables();
        tables.dc_luma.insert(1, code("1111111111111111"));

        let mut writer = ContainerWriter::new(Vec::new());
        assert!(matches!(
            writer.write_tables(&tables),
            Err(CodecError::ValueTooWide { value: 16, width: 4 })
        ));
    }

    #[test]
    fn test_zero_code_length_is_corrupt() {
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer.write(TABLE_SIZE_BITS, 1u16).unwrap();
        writer.write(CATEGORY_BITS, 3u8).unwrap();
        writer.write(DC_CODE_LENGTH_BITS, 0u8).unwrap();
        writer.byte_align().unwrap();
        let bytes = writer.into_writer();

        let result = ContainerReader::new(&bytes[..]).read_dc_table();
        assert!(matches!(result, Err(CodecError::CorruptTable { .. })));
    }

    #[test]
    fn test_ac_code_length_above_limit() {
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer.write(TABLE_SIZE_BITS, 1u16).unwrap();
        writer.write(RUN_LENGTH_BITS + SIZE_BITS, 0u8).unwrap();
        writer.write(AC_CODE_LENGTH_BITS, 65u8).unwrap();
        writer.write(64, u64::MAX).unwrap();
        writer.write(8, 0u8).unwrap();
        let bytes = writer.into_writer();

        let result = ContainerReader::new(&bytes[..]).read_ac_table();
        assert!(matches!(result, Err(CodecError::CodeTooLong { len: 65 })));
    }

    #[test]
    fn test_duplicate_table_entry_is_corrupt() {
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer.write(TABLE_SIZE_BITS, 2u16).unwrap();
        for code in [0u8, 1] {
            writer.write(CATEGORY_BITS, 4u8).unwrap();
            writer.write(DC_CODE_LENGTH_BITS, 1u8).unwrap();
            writer.write_bit(code == 1).unwrap();
        }
        writer.byte_align().unwrap();
        let bytes = writer.into_writer();

        let result = ContainerReader::new(&bytes[..]).read_dc_table();
        assert!(matches!(result, Err(CodecError::CorruptTable { .. })));
    }

    #[test]
    fn test_truncated_container() {
        let image = sample_image();
        let tables = CodeTables::build(&image).unwrap();
        let bytes = encode(&tables, &image);
        let truncated = &bytes[..bytes.len() - 2];

        let mut reader = ContainerReader::new(truncated);
        let decode_tables = DecodeTables::new(&reader.read_tables().unwrap()).unwrap();
        let count = reader.read_block_count().unwrap();
        let result = (0..count).try_for_each(|_| reader.read_block(&decode_tables).map(|_| ()));
        assert!(matches!(result, Err(CodecError::UnexpectedEof)));
    }

    #[test]
    fn test_invalid_huffman_code() {
        let mut tables = minimal_tables();
        tables.dc_luma = HuffmanTable::new();
        tables.dc_luma.insert(0, code("00"));
        let decode_tables = DecodeTables::new(&tables).unwrap();

        let bytes = [0b1000_0000u8];
        let result = ContainerReader::new(&bytes[..]).read_block(&decode_tables);
        assert!(matches!(result, Err(CodecError::InvalidHuffmanCode)));
    }

    #[test]
    fn test_read_int() {
        let pattern = uint_to_binstr(0b010, 3).unwrap();
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer.write(3, pattern.bits()).unwrap();
        writer.write(4, 0b1011u8).unwrap();
        writer.byte_align().unwrap();
        let bytes = writer.into_writer();

        let mut reader = ContainerReader::new(&bytes[..]);
        assert_eq!(reader.read_int(3).unwrap(), -5);
        assert_eq!(reader.read_int(0).unwrap(), 0);
        assert_eq!(reader.read_int(4).unwrap(), 11);
    }
}
