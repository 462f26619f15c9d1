// Tue Feb 3 2026 - Jo
use itertools::Itertools;

use crate::cg::error::CgError;
use crate::cg::types::Pc;

const HEADER_INDIRECT_TARGET_TYPES: &str = "INDIRECT TARGET TYPES";
const HEADER_INDIRECT_CALL_TYPES: &str = "INDIRECT CALL TYPES";
const HEADER_INDIRECT_CALL_SITES: &str = "INDIRECT CALL SITES";
const HEADER_DIRECT_CALL_SITES: &str = "DIRECT CALL SITES";
const HEADER_FUNCTIONS: &str = "FUNCTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SectionKind {
    IndirectTargetTypes,
    IndirectCallTypes,
    IndirectCallSites,
    DirectCallSites,
    Functions,
}

impl SectionKind {
    fn name(self) -> &'static str {
        match self {
            Self::IndirectTargetTypes => HEADER_INDIRECT_TARGET_TYPES,
            Self::IndirectCallTypes => HEADER_INDIRECT_CALL_TYPES,
            Self::IndirectCallSites => HEADER_INDIRECT_CALL_SITES,
            Self::DirectCallSites => HEADER_DIRECT_CALL_SITES,
            Self::Functions => HEADER_FUNCTIONS,
        }
    }

    /// A header line starts with (not equals) the section's literal name; trailing
    /// text on the header line itself is ignored, mirroring the reference dump format.
    fn from_header_line(line: &str) -> Option<Self> {
        // Longest-prefix match first: none of the headers are prefixes of one
        // another today, but check order stays stable if that ever changes.
        const ALL: [SectionKind; 5] = [
            SectionKind::IndirectTargetTypes,
            SectionKind::IndirectCallTypes,
            SectionKind::IndirectCallSites,
            SectionKind::DirectCallSites,
            SectionKind::Functions,
        ];
        ALL.into_iter().find(|kind| line.starts_with(kind.name()))
    }
}

/// One `UNKNOWN`-tagged or type-id-tagged record from `INDIRECT TARGET TYPES`.
pub enum TargetTypeRecord {
    Unknown(Vec<Pc>),
    Typed(u64, Vec<Pc>),
}

/// Raw, order-preserving records parsed out of the call-graph dump, grammar
/// validated but not yet cross-referenced into a `RawCallGraph`.
#[derive(Default)]
pub struct Sections {
    pub indirect_target_types: Vec<TargetTypeRecord>,
    pub indirect_call_types: Vec<(u64, Vec<Pc>)>,
    pub indirect_call_sites: Vec<(Pc, Vec<Pc>)>,
    pub direct_call_sites: Vec<(Pc, Vec<(Pc, Pc)>)>,
    pub functions: Vec<(Pc, String)>,
}

fn parse_hex(line: usize, token: &str) -> Result<u64, CgError> {
    u64::from_str_radix(token, 16).map_err(|_| CgError::InvalidHex {
        line,
        token: token.to_string(),
    })
}

fn parse_hex_list(line: usize, tokens: &mut std::str::SplitWhitespace) -> Result<Vec<Pc>, CgError> {
    tokens.map(|t| parse_hex(line, t)).collect()
}

fn parse_target_type_record(line_no: usize, line: &str) -> Result<TargetTypeRecord, CgError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CgError::MissingHexToken { line: line_no })?;
    if first == "UNKNOWN" {
        Ok(TargetTypeRecord::Unknown(parse_hex_list(line_no, &mut tokens)?))
    } else {
        let type_id = parse_hex(line_no, first)?;
        Ok(TargetTypeRecord::Typed(type_id, parse_hex_list(line_no, &mut tokens)?))
    }
}

fn parse_call_type_record(line_no: usize, line: &str) -> Result<(u64, Vec<Pc>), CgError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CgError::MissingHexToken { line: line_no })?;
    let type_id = parse_hex(line_no, first)?;
    Ok((type_id, parse_hex_list(line_no, &mut tokens)?))
}

fn parse_indirect_call_site_record(line_no: usize, line: &str) -> Result<(Pc, Vec<Pc>), CgError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CgError::MissingHexToken { line: line_no })?;
    let caller = parse_hex(line_no, first)?;
    Ok((caller, parse_hex_list(line_no, &mut tokens)?))
}

fn parse_direct_call_site_record(
    line_no: usize,
    line: &str,
) -> Result<(Pc, Vec<(Pc, Pc)>), CgError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CgError::MissingHexToken { line: line_no })?;
    let caller = parse_hex(line_no, first)?;

    let rest: Vec<&str> = tokens.collect();
    if rest.len() % 2 != 0 {
        let call_site = parse_hex(line_no, rest[rest.len() - 1])?;
        return Err(CgError::TruncatedDirectPair { line: line_no, call_site });
    }
    let pairs = rest
        .into_iter()
        .tuples()
        .map(|(call_site_tok, target_tok)| {
            Ok((parse_hex(line_no, call_site_tok)?, parse_hex(line_no, target_tok)?))
        })
        .collect::<Result<Vec<_>, CgError>>()?;
    Ok((caller, pairs))
}

fn parse_function_record(line_no: usize, line: &str) -> Result<(Pc, String), CgError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CgError::MissingHexToken { line: line_no })?;
    let pc = parse_hex(line_no, first)?;
    let name = tokens
        .next()
        .ok_or(CgError::MissingFunctionName { line: line_no, pc })?;
    Ok((pc, name.to_string()))
}

/// Splits the dump into its (at most five) sections and parses each record,
/// per-record, into its section's grammar. Unknown headers are skipped as
/// plain lines; a blank line always terminates whatever section is open.
pub fn tokenize(text: &str) -> Result<Sections, CgError> {
    let mut sections = Sections::default();
    let mut seen = std::collections::HashSet::new();

    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0usize;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }
        let Some(kind) = SectionKind::from_header_line(trimmed) else {
            i += 1;
            continue;
        };
        if !seen.insert(kind) {
            return Err(CgError::DuplicateSection {
                line: i + 1,
                section: kind.name(),
            });
        }
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() {
            let line_no = i + 1;
            let body = lines[i];
            match kind {
                SectionKind::IndirectTargetTypes => sections
                    .indirect_target_types
                    .push(parse_target_type_record(line_no, body)?),
                SectionKind::IndirectCallTypes => sections
                    .indirect_call_types
                    .push(parse_call_type_record(line_no, body)?),
                SectionKind::IndirectCallSites => sections
                    .indirect_call_sites
                    .push(parse_indirect_call_site_record(line_no, body)?),
                SectionKind::DirectCallSites => sections
                    .direct_call_sites
                    .push(parse_direct_call_site_record(line_no, body)?),
                SectionKind::Functions => {
                    sections.functions.push(parse_function_record(line_no, body)?)
                }
            }
            i += 1;
        }
    }
    Ok(sections)
}
