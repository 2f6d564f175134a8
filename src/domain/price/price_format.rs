//! Currency display detection and reconstruction

/// Where the currency symbol sits relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    Before,
    After,
    None,
}

/// Display convention learned from a sample such as `"¥68.00"`, `"45,00 €"` or `"6,578円"`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFormat {
    pub symbol: String,
    pub placement: SymbolPlacement,
    /// Whitespace between symbol and number, kept verbatim (may be a no-break space)
    pub gap: String,
    pub decimals: usize,
    pub decimal_separator: char,
    pub group_separator: Option<char>,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            placement: SymbolPlacement::None,
            gap: String::new(),
            decimals: 2,
            decimal_separator: '.',
            group_separator: None,
        }
    }
}

impl PriceFormat {
    /// `None` when the sample holds no digits at all.
    pub fn detect(sample: &str) -> Option<Self> {
        let start = sample.find(|c: char| c.is_ascii_digit())?;
        let end = sample.rfind(|c: char| c.is_ascii_digit())? + 1;

        let prefix = &sample[..start];
        let core = &sample[start..end];
        let suffix = &sample[end..];

        let (symbol, placement, gap) = if !prefix.trim().is_empty() {
            let symbol = prefix.trim_end();
            (symbol.trim_start(), SymbolPlacement::Before, &prefix[symbol.len()..])
        } else if !suffix.trim().is_empty() {
            let symbol = suffix.trim_start();
            let gap = &suffix[..suffix.len() - symbol.len()];
            (symbol.trim_end(), SymbolPlacement::After, gap)
        } else {
            ("", SymbolPlacement::None, "")
        };

        let (decimals, decimal_separator, group_separator) = Self::detect_separators(core);

        Some(Self {
            symbol: symbol.to_string(),
            placement,
            gap: gap.to_string(),
            decimals,
            decimal_separator,
            group_separator,
        })
    }

    /// The last separator is decimal unless it is a lone comma before exactly three digits
    /// or repeats, in which case it groups thousands.
    fn detect_separators(core: &str) -> (usize, char, Option<char>) {
        let separators: Vec<(usize, char)> = core
            .char_indices()
            .filter(|(_, c)| !c.is_ascii_digit())
            .collect();

        let Some(&(last_pos, last)) = separators.last() else {
            return (0, '.', None);
        };

        let digits_after = core[last_pos + last.len_utf8()..]
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count();
        let occurrences = separators.iter().filter(|(_, c)| *c == last).count();
        let other = separators.iter().map(|(_, c)| *c).find(|c| *c != last);

        if other.is_none() && (occurrences > 1 || (last == ',' && digits_after == 3)) {
            let decimal = if last == '.' { ',' } else { '.' };
            return (0, decimal, Some(last));
        }

        (digits_after, last, other)
    }

    pub fn render(&self, amount: f64) -> String {
        let number = self.render_number(amount);
        match self.placement {
            SymbolPlacement::Before => format!("{}{}{}", self.symbol, self.gap, number),
            SymbolPlacement::After => format!("{}{}{}", number, self.gap, self.symbol),
            SymbolPlacement::None => number,
        }
    }

    fn render_number(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.decimals, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (fixed, None),
        };

        let int_part = match self.group_separator {
            Some(sep) => group_thousands(&int_part, sep),
            None => int_part,
        };

        let sign = if amount < 0.0 { "-" } else { "" };
        match frac_part {
            Some(frac) => format!("{}{}{}{}", sign, int_part, self.decimal_separator, frac),
            None => format!("{}{}", sign, int_part),
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
