//! Chat command parsing.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Smallest amount accepted by `/buy`, in EUR.
pub const MIN_PURCHASE_EUR: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/buy` and its first argument, if any.
    Buy(Option<String>),
    /// Any other `/command`.
    Unknown(String),
}

impl Command {
    /// Parse a message. Returns `None` for plain text.
    ///
    /// Accepts the `/command@BotName` form used in group chats.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or_default();
        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "buy" => Command::Buy(tokens.next().map(str::to_owned)),
            _ => Command::Unknown(name.to_owned()),
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    Missing,
    Invalid,
    BelowMinimum,
}

/// Parse a `/buy` argument into a EUR amount of at least [`MIN_PURCHASE_EUR`].
///
/// A comma is accepted as decimal separator (`0,25`).
pub fn parse_amount(arg: Option<&str>) -> Result<Decimal, AmountError> {
    let raw = arg.map(str::trim).filter(|s| !s.is_empty()).ok_or(AmountError::Missing)?;
    let normalized = raw.replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| AmountError::Invalid)?;
    if amount < MIN_PURCHASE_EUR {
        return Err(AmountError::BelowMinimum);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(
            Command::parse("/buy 10"),
            Some(Command::Buy(Some("10".into())))
        );
        assert_eq!(
            Command::parse("  /buy   12.5 extra"),
            Some(Command::Buy(Some("12.5".into())))
        );
        assert_eq!(Command::parse("/buy"), Some(Command::Buy(None)));
        assert_eq!(
            Command::parse("/buy@CashCenterBot 3"),
            Some(Command::Buy(Some("3".into())))
        );
        assert_eq!(
            Command::parse("/help"),
            Some(Command::Unknown("help".into()))
        );
        assert_eq!(Command::parse("buyer@example.com"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("10")), Ok(Decimal::new(10, 0)));
        assert_eq!(parse_amount(Some("0.25")), Ok(Decimal::new(25, 2)));
        assert_eq!(parse_amount(Some("0,25")), Ok(Decimal::new(25, 2)));
        assert_eq!(parse_amount(Some("1e2")), Ok(Decimal::new(100, 0)));
        assert_eq!(parse_amount(None), Err(AmountError::Missing));
        assert_eq!(parse_amount(Some("  ")), Err(AmountError::Missing));
        assert_eq!(parse_amount(Some("ten")), Err(AmountError::Invalid));
        assert_eq!(parse_amount(Some("NaN")), Err(AmountError::Invalid));
        assert_eq!(parse_amount(Some("0.24")), Err(AmountError::BelowMinimum));
        assert_eq!(parse_amount(Some("-5")), Err(AmountError::BelowMinimum));
    }
}
