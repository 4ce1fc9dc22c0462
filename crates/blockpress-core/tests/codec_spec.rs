use bitstream_io::{BigEndian, BitWrite, BitWriter};
use speculate::speculate;

use blockpress_core::bits::{bits_required, int_to_binstr};
use blockpress_core::container::{ContainerReader, ContainerWriter};
use blockpress_core::huffman::{Frequencies, HuffmanTable, PrefixDecoder};
use blockpress_core::matrix::{Matrix, BLOCK_SIDE};
use blockpress_core::media::YCbCrImage;
use blockpress_core::quantize::{dequantize, ChannelRole, QuantTable};
use blockpress_core::rle::{run_length_encode, RunSize, AC_LEN};
use blockpress_core::tables::DecodeTables;
use blockpress_core::transform::{Dct2d, Transform};
use blockpress_core::zigzag::{block_to_zigzag, zigzag_to_block};
use blockpress_core::{BlockGrid, CodeTables, CoefficientPair, Decoder, Encoder, ImageCoefficients};

fn noisy_image(width: u32, height: u32, seed: u64) -> YCbCrImage {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut image = YCbCrImage::new(width, height);
    for channel in 0..3 {
        for y in 0..height {
            for x in 0..width {
                let base = (x * 4 + y * 2 + channel as u32 * 40) % 200;
                image.set_sample(channel, x, y, (base + rng.u32(0..40)) as u8);
            }
        }
    }
    image
}

speculate! {
    describe "bit primitives" {
        it "should decode what int_to_binstr encoded for every category" {
            for v in -32767..=32767 {
                let bits = int_to_binstr(v);
                assert_eq!(bits.len(), bits_required(v));

                let mut writer = BitWriter::endian(Vec::new(), BigEndian);
                if !bits.is_empty() {
                    writer.write(bits.len() as u32, bits.bits()).unwrap();
                }
                writer.byte_align().unwrap();
                let bytes = writer.into_writer();

                let mut reader = ContainerReader::new(&bytes[..]);
                assert_eq!(reader.read_int(bits_required(v)).unwrap(), v, "value {}", v);
            }
        }

        it "should encode -5 as category 3 with bits 010" {
            assert_eq!(bits_required(-5), 3);
            assert_eq!(int_to_binstr(-5).to_string(), "010");

            let bytes = [0b0100_0000u8];
            let mut reader = ContainerReader::new(&bytes[..]);
            assert_eq!(reader.read_int(3).unwrap(), -5);
        }
    }

    describe "zigzag mapping" {
        it "should be a bijection on random 8x8 blocks" {
            let mut rng = fastrand::Rng::with_seed(7);
            for _ in 0..100 {
                let block = Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |_, _| rng.i32(-1024..1024));
                assert_eq!(zigzag_to_block(&block_to_zigzag(&block)).unwrap(), block);
            }
        }
    }

    describe "huffman tables" {
        it "should produce prefix free codes for random alphabets" {
            let mut rng = fastrand::Rng::with_seed(42);
            for _ in 0..50 {
                let frequencies: Frequencies<RunSize> = (0..rng.usize(1..500))
                    .map(|_| RunSize::new(rng.u8(0..16), rng.u8(0..11)))
                    .collect();
                let table = HuffmanTable::from_frequencies(&frequencies).unwrap();

                assert_eq!(table.len(), frequencies.len());
                for (symbol, _) in frequencies.iter() {
                    assert!(table.get(&symbol).unwrap().len() >= 1);
                }
                // a prefix collision is rejected by the decoder trie
                PrefixDecoder::from_table(&table).unwrap();
            }
        }

        it "should give a lone AC symbol a decodable code" {
            let image: ImageCoefficients =
                std::iter::repeat([CoefficientPair::default(); 3]).take(4).collect();
            let tables = CodeTables::build(&image).unwrap();

            assert_eq!(tables.ac_luma.len(), 1);
            assert_eq!(tables.ac_luma.get(&RunSize::EOB).unwrap().len(), 1);

            let mut writer = ContainerWriter::new(Vec::new());
            writer.write_tables(&tables).unwrap();
            writer.write_block_count(image.len()).unwrap();
            for block in image.blocks() {
                writer.write_block(block, &tables).unwrap();
            }
            let bytes = writer.finish().unwrap();

            let (_, decoded) = Decoder::default().read(&bytes[..]).unwrap();
            assert_eq!(decoded, image);
        }
    }

    describe "run length coder" {
        it "should turn an all zero AC sequence into a single end of block" {
            let encoded = run_length_encode(&[0; AC_LEN]).unwrap();
            assert_eq!(encoded.symbols, vec![RunSize::EOB]);
            assert!(encoded.values.iter().all(|v| v.is_empty()));
        }
    }

    describe "container round trip" {
        before {
            let image = noisy_image(40, 24, 1234);
            let encoder = Encoder::default();
            let coefficients = encoder.analyze(&image).unwrap();
            let tables = encoder.build_tables(&coefficients).unwrap();
            let bytes = encoder.write(&coefficients, &tables, Vec::new()).unwrap();
        }

        it "should reproduce tables and coefficients exactly" {
            let (read_tables, read_coefficients) = Decoder::default().read(&bytes[..]).unwrap();
            assert_eq!(read_tables, tables);
            assert_eq!(read_coefficients, coefficients);
        }

        it "should only lose what quantization rounds away" {
            let (_, read_coefficients) = Decoder::default().read(&bytes[..]).unwrap();
            let grid = BlockGrid::covering(40, 24);

            for (index, (block, read_block)) in coefficients
                .blocks()
                .iter()
                .zip(read_coefficients.blocks())
                .enumerate()
            {
                let (x0, y0) = grid.origin(index);
                for channel in 0..3 {
                    let table = QuantTable::for_role(ChannelRole::of_channel(channel));
                    let restored = dequantize(
                        &zigzag_to_block(&read_block[channel].to_zigzag()).unwrap(),
                        table,
                    )
                    .unwrap();
                    let original = Dct2d.forward(&Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |r, c| {
                        image.sample(channel, x0 + c as u32, y0 + r as u32) as f64 - 128.0
                    }));
                    for (i, (&q, &v)) in table
                        .values()
                        .iter()
                        .zip(restored.as_slice())
                        .enumerate()
                    {
                        let error = (original.as_slice()[i] - v as f64).abs();
                        assert!(error <= q as f64 / 2.0 + 1e-6, "block {} channel {}", index, channel);
                    }
                    assert_eq!(block[channel], read_block[channel]);
                }
            }
        }

        it "should be readable with tables handed in separately" {
            let mut reader = ContainerReader::new(&bytes[..]);
            let decode_tables = DecodeTables::new(&reader.read_tables().unwrap()).unwrap();
            assert_eq!(reader.read_block_count().unwrap() as usize, coefficients.len());
            let first = reader.read_block(&decode_tables).unwrap();
            assert_eq!(&first, coefficients.block(0));
        }
    }
}
