//! Insert STARSolo cell barcode and UMI tags into text SAM records.

use crate::core::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, Write};

pub const HEADER_MARKER: u8 = b'@';
pub const READ_GROUP_PREFIX: &str = "RG:Z:";
pub const BARCODE_QUALITY_FIELD: &str = "CY:Z:FFFFFFFFFFFFFFFF";
pub const UMI_QUALITY_FIELD: &str = "UY:Z:FFFFFFFFFF";
pub const UMI_LEN: usize = 10;
const UMI_ALPHABET: &[u8; 4] = b"ATGC";

/// Line counts gathered while patching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchStats {
    pub headers: u64,
    pub patched: u64,
    /// Alignment lines without an `RG:Z:` field, written unchanged.
    pub untagged: u64,
}

impl PatchStats {
    pub fn lines(&self) -> u64 {
        self.headers + self.patched + self.untagged
    }
}

/// Create the UMI generator, seeded when reproducible output is wanted.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Adds `CR`/`CY`/`CB`/`UR`/`UY` fields after the read group of every alignment line.
pub struct TagPatcher<R: Rng> {
    raw_barcode_field: String,
    cell_barcode_field: String,
    rng: R,
    stats: PatchStats,
}

impl<R: Rng> TagPatcher<R> {
    pub fn new(barcode: &str, rng: R) -> Self {
        Self {
            raw_barcode_field: format!("CR:Z:{}", barcode),
            cell_barcode_field: format!("CB:Z:{}-1", barcode),
            rng,
            stats: PatchStats::default(),
        }
    }

    pub fn stats(&self) -> PatchStats {
        self.stats
    }

    /// Draw a fresh UMI, each base uniform over `ATGC`.
    pub fn random_umi(&mut self) -> String {
        (0..UMI_LEN)
            .map(|_| UMI_ALPHABET[self.rng.gen_range(0..UMI_ALPHABET.len())] as char)
            .collect()
    }

    /// Patch one line given without its terminator.
    pub fn patch_line(&mut self, line: &str) -> String {
        let mut out = Vec::with_capacity(line.len() + 96);
        self.patch_into(line.as_bytes(), &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Append the patched form of `line` (no terminator) to `out`.
    pub fn patch_into(&mut self, line: &[u8], out: &mut Vec<u8>) {
        if line.first() == Some(&HEADER_MARKER) {
            self.stats.headers += 1;
            out.extend_from_slice(line);
            return;
        }

        let insert_at = match read_group_end(line) {
            Some(end) => end,
            None => {
                self.stats.untagged += 1;
                out.extend_from_slice(line);
                return;
            }
        };

        let umi = self.random_umi();
        out.extend_from_slice(&line[..insert_at]);
        for field in [
            self.raw_barcode_field.as_str(),
            BARCODE_QUALITY_FIELD,
            self.cell_barcode_field.as_str(),
        ] {
            out.push(b'\t');
            out.extend_from_slice(field.as_bytes());
        }
        out.extend_from_slice(b"\tUR:Z:");
        out.extend_from_slice(umi.as_bytes());
        out.push(b'\t');
        out.extend_from_slice(UMI_QUALITY_FIELD.as_bytes());
        out.extend_from_slice(&line[insert_at..]);
        self.stats.patched += 1;
    }

    /// Patch every line of `input` into `output`, keeping line terminators as found.
    pub fn patch_stream<I: BufRead, W: Write>(
        &mut self,
        mut input: I,
        output: &mut W,
    ) -> Result<PatchStats> {
        let mut line = Vec::with_capacity(1024);
        let mut out = Vec::with_capacity(1024);

        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            let body_len = body_len(&line);
            out.clear();
            self.patch_into(&line[..body_len], &mut out);
            out.extend_from_slice(&line[body_len..]);
            output.write_all(&out)?;
        }

        output.flush()?;
        Ok(self.stats)
    }
}

/// Byte offset just past the first tab-separated field starting with `RG:Z:`.
fn read_group_end(line: &[u8]) -> Option<usize> {
    let mut offset = 0;
    for field in line.split(|&b| b == b'\t') {
        let end = offset + field.len();
        if field.starts_with(READ_GROUP_PREFIX.as_bytes()) {
            return Some(end);
        }
        offset = end + 1;
    }
    None
}

/// Length of `line` without a trailing `\n` or `\r\n`.
fn body_len(line: &[u8]) -> usize {
    let mut len = line.len();
    if len > 0 && line[len - 1] == b'\n' {
        len -= 1;
        if len > 0 && line[len - 1] == b'\r' {
            len -= 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn patcher(seed: u64) -> TagPatcher<StdRng> {
        TagPatcher::new("AAAA", create_rng(Some(seed)))
    }

    fn patch_text(patcher: &mut TagPatcher<StdRng>, text: &str) -> String {
        let mut out = Vec::new();
        patcher
            .patch_stream(Cursor::new(text.as_bytes().to_vec()), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn assert_umi(field: &str) {
        let umi = field.strip_prefix("UR:Z:").expect("UR:Z: prefix");
        assert_eq!(umi.len(), UMI_LEN);
        assert!(umi.bytes().all(|b| UMI_ALPHABET.contains(&b)), "{}", umi);
    }

    #[test]
    fn inserts_tags_after_read_group() {
        let mut patcher = patcher(7);
        let patched = patcher.patch_line("A\tB\tRG:Z:xyz\tC");
        let fields: Vec<&str> = patched.split('\t').collect();

        assert_eq!(fields.len(), 9);
        assert_eq!(
            &fields[..6],
            &[
                "A",
                "B",
                "RG:Z:xyz",
                "CR:Z:AAAA",
                "CY:Z:FFFFFFFFFFFFFFFF",
                "CB:Z:AAAA-1"
            ]
        );
        assert_umi(fields[6]);
        assert_eq!(&fields[7..], &["UY:Z:FFFFFFFFFF", "C"]);
        assert_eq!(patcher.stats().patched, 1);
    }

    #[test]
    fn only_first_read_group_is_patched() {
        let mut patcher = patcher(1);
        let patched = patcher.patch_line("r1\tRG:Z:a\tRG:Z:b");
        let fields: Vec<&str> = patched.split('\t').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[1], "RG:Z:a");
        assert_eq!(fields[2], "CR:Z:AAAA");
        assert_eq!(fields[7], "RG:Z:b");
    }

    #[test]
    fn headers_and_untagged_records_pass_through() {
        let mut patcher = patcher(3);
        assert_eq!(patcher.patch_line("@RG\tID:x\tRG:Z:x"), "@RG\tID:x\tRG:Z:x");
        assert_eq!(patcher.patch_line("r1\t0\tchr1\t5"), "r1\t0\tchr1\t5");
        assert_eq!(patcher.patch_line(""), "");
        assert_eq!(
            patcher.stats(),
            PatchStats {
                headers: 1,
                patched: 0,
                untagged: 2
            }
        );
    }

    #[test]
    fn read_group_as_last_field_keeps_terminator_at_end() {
        let mut patcher = patcher(5);
        let out = patch_text(&mut patcher, "@HD\tVN:1.6\r\nr1\tRG:Z:x\r\nr2\tRG:Z:y");
        let lines: Vec<&str> = out.split_inclusive('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "@HD\tVN:1.6\r\n");
        assert!(lines[1].ends_with("\tUY:Z:FFFFFFFFFF\r\n"));
        assert!(lines[1].starts_with("r1\tRG:Z:x\tCR:Z:AAAA\t"));
        assert!(lines[2].ends_with("\tUY:Z:FFFFFFFFFF"));
        assert!(!lines[2].ends_with('\n'));
    }

    #[test]
    fn seeded_runs_are_identical_and_seeds_differ() {
        let text = "r1\tRG:Z:x\nr2\tRG:Z:x\nr3\tRG:Z:x\n";
        let first = patch_text(&mut patcher(42), text);
        let second = patch_text(&mut patcher(42), text);
        let other = patch_text(&mut patcher(43), text);

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn unseeded_runs_differ_only_in_umi() {
        let text = "r1\t0\tRG:Z:x\tNH:i:1\n";
        let mut a = TagPatcher::new("CCGT", create_rng(None));
        let mut b = TagPatcher::new("CCGT", create_rng(None));
        let (mut out_a, mut out_b) = (Vec::new(), Vec::new());
        a.patch_stream(Cursor::new(text), &mut out_a).unwrap();
        b.patch_stream(Cursor::new(text), &mut out_b).unwrap();

        let out_a = String::from_utf8(out_a).unwrap();
        let out_b = String::from_utf8(out_b).unwrap();
        let fields_a: Vec<&str> = out_a.trim_end().split('\t').collect();
        let fields_b: Vec<&str> = out_b.trim_end().split('\t').collect();
        assert_eq!(fields_a.len(), fields_b.len());
        for (idx, (fa, fb)) in fields_a.iter().zip(fields_b.iter()).enumerate() {
            if idx == 6 {
                assert_umi(fa);
                assert_umi(fb);
            } else {
                assert_eq!(fa, fb);
            }
        }
    }

    fn sam_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "@[A-Z]{2}\t[A-Za-z0-9:]{0,12}",
            (
                prop::collection::vec("[A-Za-z0-9:]{0,8}", 1..8),
                prop::option::of((0usize..8, "[A-Za-z0-9]{0,6}")),
            )
                .prop_map(|(mut fields, rg)| {
                    if let Some((pos, value)) = rg {
                        let pos = pos.min(fields.len());
                        fields.insert(pos, format!("RG:Z:{}", value));
                    }
                    fields.join("\t")
                }),
        ]
    }

    proptest! {
        #[test]
        fn preserves_lines_and_adds_five_fields(
            lines in prop::collection::vec(sam_line(), 0..20),
            seed in any::<u64>(),
        ) {
            let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
            let output = patch_text(&mut patcher(seed), &input);
            let out_lines: Vec<&str> = output.split_terminator('\n').collect();
            prop_assert_eq!(out_lines.len(), lines.len());

            for (before, after) in lines.iter().zip(out_lines.iter()) {
                if before.starts_with('@') {
                    prop_assert_eq!(before.as_str(), *after);
                    continue;
                }

                let in_fields: Vec<&str> = before.split('\t').collect();
                let out_fields: Vec<&str> = after.split('\t').collect();
                match in_fields.iter().position(|f| f.starts_with(READ_GROUP_PREFIX)) {
                    Some(rg) => {
                        prop_assert_eq!(out_fields.len(), in_fields.len() + 5);
                        prop_assert_eq!(&out_fields[..=rg], &in_fields[..=rg]);
                        prop_assert_eq!(out_fields[rg + 1], "CR:Z:AAAA");
                        prop_assert_eq!(out_fields[rg + 2], BARCODE_QUALITY_FIELD);
                        prop_assert_eq!(out_fields[rg + 3], "CB:Z:AAAA-1");
                        prop_assert!(out_fields[rg + 4].starts_with("UR:Z:"));
                        prop_assert_eq!(out_fields[rg + 4].len(), 5 + UMI_LEN);
                        prop_assert_eq!(out_fields[rg + 5], UMI_QUALITY_FIELD);
                        prop_assert_eq!(&out_fields[rg + 6..], &in_fields[rg + 1..]);
                    }
                    None => {
                        prop_assert_eq!(before.as_str(), *after);
                    }
                }
            }
        }
    }
}
