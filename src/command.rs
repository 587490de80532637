/// What the driver was asked to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Walks through the default ISA: listing, analysis, diagrams, codec and docs.
    Demo,
    Doc,
    Analyze,
    Show(String),
    Encode {
        mnemonic: String,
        operands: Vec<u32>,
    },
    Decode(Vec<u16>),
    Export(String),
    Import(String),
}

pub const USAGE: &str = "usage: cvere [doc | analyze | show <MNEMONIC> | encode <MNEMONIC> <op>... | \
decode <word>... | export <file> | import <file>]";

impl TryFrom<&[String]> for Command {
    type Error = String;

    fn try_from(args: &[String]) -> Result<Self, Self::Error> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Self::Demo);
        };

        match (name.as_str(), rest) {
            ("doc", []) => Ok(Self::Doc),
            ("analyze", []) => Ok(Self::Analyze),
            ("show", [mnemonic]) => Ok(Self::Show(mnemonic.clone())),
            ("encode", [mnemonic, operands @ ..]) => Ok(Self::Encode {
                mnemonic: mnemonic.clone(),
                operands: operands
                    .iter()
                    .map(|op| parse_number(op))
                    .collect::<Result<_, _>>()?,
            }),
            ("decode", words) if !words.is_empty() => Ok(Self::Decode(
                words
                    .iter()
                    .map(|word| {
                        let value = parse_number(word)?;
                        u16::try_from(value).map_err(|_| format!("{word} is not a 16-bit word"))
                    })
                    .collect::<Result<_, _>>()?,
            )),
            ("export", [path]) => Ok(Self::Export(path.clone())),
            ("import", [path]) => Ok(Self::Import(path.clone())),
            _ => Err(USAGE.to_string()),
        }
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
pub fn parse_number(text: &str) -> Result<u32, String> {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map_or_else(|| text.parse(), |hex| u32::from_str_radix(hex, 16))
        .map_err(|e| format!("invalid number {text}: {e}"))
}
