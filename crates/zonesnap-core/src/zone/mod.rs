//! Zone file parser and canonical record set
//!
//! Parses a textual zone definition (RFC 1035 master-file grammar) into a
//! set of discrete resource records and canonicalizes them so that two
//! snapshots containing the same records in any input order compare equal.
//!
//! ## Grammar coverage
//!
//! - `;` comments (quote-aware)
//! - multi-line records grouped by parentheses
//! - `$ORIGIN` and `$TTL` directives
//! - owner-name inheritance (a line starting with whitespace reuses the
//!   previous owner), `@` as the origin
//! - TTL and class in either order, TTL unit suffixes (s/m/h/d/w)
//! - quoted rdata strings kept intact (TXT)
//!
//! ## Degradation policy
//!
//! Malformed entries are skipped, never fatal: a single bad line must not
//! prevent comparison of the rest of the zone. Skips are logged at debug
//! level. Unsupported directives (`$INCLUDE`, `$GENERATE`) are skipped the
//! same way.

use tracing::debug;

/// One parsed resource record.
///
/// Two records are equal iff their canonical renderings are equal; the
/// rendering is independent of input whitespace, line order, and comment
/// placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Owner name, absolutized against `$ORIGIN`
    pub name: String,
    /// Time to live in seconds
    pub ttl: u32,
    /// Record class (usually `IN`)
    pub class: String,
    /// Record type (`A`, `AAAA`, `MX`, ...)
    pub rtype: String,
    /// Type-specific data, tokens joined by single spaces
    pub rdata: String,
}

impl Record {
    /// Canonical string rendering: `name ttl class type rdata` with single
    /// spaces. This is the comparison key for change detection.
    pub fn canonical(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.name, self.ttl, self.class, self.rtype, self.rdata
        )
    }
}

/// The order-independent representation of one snapshot's records.
///
/// Records are sorted descending by canonical rendering, so equality of
/// two sets is equality of their rendering sequences regardless of the
/// input line order.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRecordSet {
    records: Vec<Record>,
}

impl CanonicalRecordSet {
    /// Number of records in the set
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in canonical (descending) order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Canonical renderings in canonical (descending) order
    pub fn renderings(&self) -> Vec<String> {
        self.records.iter().map(Record::canonical).collect()
    }
}

impl PartialEq for CanonicalRecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.renderings() == other.renderings()
    }
}

impl Eq for CanonicalRecordSet {}

/// Parse a zone's textual record definition into its canonical record set.
///
/// Empty input produces an empty set. Malformed entries are dropped.
pub fn parse(zone_text: &str) -> CanonicalRecordSet {
    let mut parser = Parser::default();
    for line in logical_lines(zone_text) {
        parser.feed(&line);
    }
    let mut records = parser.records;
    records.sort_by(|a, b| b.canonical().cmp(&a.canonical()));
    CanonicalRecordSet { records }
}

/// Parser state threaded across logical lines.
#[derive(Default)]
struct Parser {
    origin: Option<String>,
    default_ttl: Option<u32>,
    last_ttl: Option<u32>,
    last_name: Option<String>,
    records: Vec<Record>,
}

impl Parser {
    fn feed(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if line.starts_with('$') {
            self.directive(line);
            return;
        }

        let inherited_owner = line.starts_with(|c: char| c.is_ascii_whitespace());
        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            return;
        }

        let name = if inherited_owner {
            match &self.last_name {
                Some(name) => name.clone(),
                None => {
                    debug!("skipping record with no owner to inherit: {line:?}");
                    return;
                }
            }
        } else {
            self.absolutize(&tokens.remove(0))
        };

        // TTL and class may appear in either order between owner and type.
        let mut ttl: Option<u32> = None;
        let mut class: Option<String> = None;
        let mut rtype: Option<String> = None;
        while !tokens.is_empty() {
            let token = tokens[0].clone();
            if ttl.is_none()
                && let Some(seconds) = parse_ttl(&token)
            {
                ttl = Some(seconds);
                tokens.remove(0);
            } else if class.is_none() && is_class(&token) {
                class = Some(token.to_ascii_uppercase());
                tokens.remove(0);
            } else if is_rtype(&token) {
                rtype = Some(token.to_ascii_uppercase());
                tokens.remove(0);
                break;
            } else {
                break;
            }
        }

        let Some(rtype) = rtype else {
            debug!("skipping entry without a record type: {line:?}");
            return;
        };
        if tokens.is_empty() {
            debug!("skipping {rtype} record without rdata: {line:?}");
            return;
        }

        let ttl = ttl
            .or(self.default_ttl)
            .or(self.last_ttl)
            .unwrap_or(0);
        self.last_ttl = Some(ttl);
        self.last_name = Some(name.clone());
        self.records.push(Record {
            name,
            ttl,
            class: class.unwrap_or_else(|| "IN".to_string()),
            rtype,
            rdata: tokens.join(" "),
        });
    }

    fn directive(&mut self, line: &str) {
        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            return;
        }
        let directive = tokens.remove(0).to_ascii_uppercase();
        match (directive.as_str(), tokens.first()) {
            ("$ORIGIN", Some(name)) => {
                self.origin = Some(ensure_fqdn(name));
            }
            ("$TTL", Some(value)) => match parse_ttl(value) {
                Some(seconds) => self.default_ttl = Some(seconds),
                None => debug!("skipping $TTL with unparseable value: {line:?}"),
            },
            _ => debug!("skipping unsupported directive: {line:?}"),
        }
    }

    /// Absolutize an owner name against the current origin.
    fn absolutize(&self, name: &str) -> String {
        if name == "@" {
            return self.origin.clone().unwrap_or_else(|| ".".to_string());
        }
        if name.ends_with('.') {
            return name.to_string();
        }
        match &self.origin {
            Some(origin) if origin == "." => format!("{name}."),
            Some(origin) => format!("{name}.{origin}"),
            None => format!("{name}."),
        }
    }
}

fn ensure_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

fn is_class(token: &str) -> bool {
    matches!(
        token.to_ascii_uppercase().as_str(),
        "IN" | "CH" | "HS" | "CS" | "NONE" | "ANY"
    )
}

/// Record types this parser recognizes, plus the RFC 3597 `TYPE<n>` form
/// for anything an exporter emits that is not on the list.
fn is_rtype(token: &str) -> bool {
    const KNOWN: &[&str] = &[
        "A", "AAAA", "NS", "CNAME", "SOA", "MX", "TXT", "PTR", "SRV", "CAA", "NAPTR", "DS",
        "DNSKEY", "RRSIG", "NSEC", "NSEC3", "NSEC3PARAM", "SPF", "SSHFP", "TLSA", "ALIAS",
        "HINFO", "DNAME", "LOC", "CERT",
    ];
    let upper = token.to_ascii_uppercase();
    if KNOWN.contains(&upper.as_str()) {
        return true;
    }
    upper
        .strip_prefix("TYPE")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Parse a TTL value: plain seconds or unit-suffixed groups (`1h30m`).
fn parse_ttl(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok();
    }
    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in token.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let multiplier: u64 = match c.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            'w' => 604800,
            _ => return None,
        };
        let value: u64 = digits.parse().ok()?;
        digits.clear();
        total = total.checked_add(value.checked_mul(multiplier)?)?;
    }
    if !digits.is_empty() {
        // Trailing bare digits after a unit group are seconds.
        total = total.checked_add(digits.parse().ok()?)?;
    }
    u32::try_from(total).ok()
}

/// Split text into logical lines: comments stripped, parenthesized
/// continuations joined, quotes respected throughout.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut depth: u32 = 0;

    for raw in text.lines() {
        let mut in_quotes = false;
        let mut escaped = false;
        for c in raw.chars() {
            if escaped {
                current.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    current.push(c);
                    escaped = true;
                }
                '"' => {
                    current.push(c);
                    in_quotes = !in_quotes;
                }
                ';' if !in_quotes => break, // comment runs to end of line
                '(' if !in_quotes => {
                    depth += 1;
                    current.push(' ');
                }
                ')' if !in_quotes => {
                    depth = depth.saturating_sub(1);
                    current.push(' ');
                }
                _ => current.push(c),
            }
        }
        if depth == 0 {
            lines.push(std::mem::take(&mut current));
        } else {
            // Continuation: keep owner-column semantics of the first line.
            current.push(' ');
        }
    }
    if !current.is_empty() {
        // Unbalanced parenthesis at end of input; keep what accumulated.
        lines.push(current);
    }
    lines
}

/// Split a logical line into whitespace-separated tokens, keeping quoted
/// strings (including their quotes) as single tokens.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                current.push(c);
                in_quotes = !in_quotes;
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
