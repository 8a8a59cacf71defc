//! Command rules for the chat channel.
//!
//! Each message text is matched against a fixed table of tokens.  Tokens
//! are grouped into independent categories; within one poll every
//! category fires at most once.  When several updates in a batch match the
//! same category, the token listed first in the table wins, then the
//! earlier update.
//!
//! | Category              | Tokens (priority order)              |
//! |-----------------------|--------------------------------------|
//! | session               | `/medir`, `/start`, `/help`          |
//! | pump                  | `/bombaligar`, `/bombadesligar`      |
//! | chart                 | `/grafico`                           |
//! | temperature threshold | `/alertatemperatura <v>`             |
//! | soil threshold        | `/alertaumidade <v>`                 |

use heapless::Vec;

use crate::app::commands::{AppCommand, ThresholdTarget};
use crate::error::CommandError;

use super::codec::BotCommand;

/// Independent command groups, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Session,
    Pump,
    Chart,
    TemperatureThreshold,
    SoilThreshold,
}

pub const CATEGORY_COUNT: usize = 5;

/// At most one command per category per poll.
pub type CommandBatch = Vec<AppCommand, CATEGORY_COUNT>;

enum Rule {
    Exact(AppCommand),
    Threshold(ThresholdTarget),
}

/// `(token, category, rule)`, in priority order within each category.
const RULES: [(&str, Category, Rule); 8] = [
    ("/medir", Category::Session, Rule::Exact(AppCommand::MeasureNow)),
    ("/start", Category::Session, Rule::Exact(AppCommand::Greeting)),
    ("/help", Category::Session, Rule::Exact(AppCommand::Help)),
    ("/bombaligar", Category::Pump, Rule::Exact(AppCommand::SetPump(true))),
    ("/bombadesligar", Category::Pump, Rule::Exact(AppCommand::SetPump(false))),
    ("/grafico", Category::Chart, Rule::Exact(AppCommand::SendChart)),
    (
        "/alertatemperatura",
        Category::TemperatureThreshold,
        Rule::Threshold(ThresholdTarget::Temperature),
    ),
    (
        "/alertaumidade",
        Category::SoilThreshold,
        Rule::Threshold(ThresholdTarget::Soil),
    ),
];

/// Menu published to the bot API at startup.
pub const BOT_COMMANDS: [BotCommand; 8] = [
    BotCommand { command: "start", description: "Start the bot and show information" },
    BotCommand { command: "medir", description: "Take a measurement now" },
    BotCommand { command: "alertatemperatura", description: "Set the temperature alert" },
    BotCommand { command: "alertaumidade", description: "Set the soil moisture alert" },
    BotCommand { command: "bombaligar", description: "Turn the water pump on" },
    BotCommand { command: "bombadesligar", description: "Turn the water pump off" },
    BotCommand { command: "grafico", description: "Chart of the latest measurements" },
    BotCommand { command: "help", description: "List the available commands" },
];

/// A recognised command: its category, its priority inside the category
/// (lower wins) and the resulting action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matched {
    pub category: Category,
    pub rank: usize,
    pub command: AppCommand,
}

/// Split off the first whitespace-delimited token.
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Parse the numeric argument: the token between the command and the next
/// whitespace (or end of text).  Missing, unparseable or non-finite values
/// are malformed.
pub fn parse_argument(rest: &str) -> Result<f32, CommandError> {
    let (token, _) = split_token(rest);
    match token.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandError::NotANumber),
    }
}

/// Match one message text against the rule table.
pub fn parse_command(text: &str) -> Option<Matched> {
    let (token, rest) = split_token(text);
    // "/medir@GrowMonitorBot" addresses this bot in group chats.
    let token = token.split_once('@').map_or(token, |(cmd, _)| cmd);

    let mut rank_in_category = [0usize; CATEGORY_COUNT];
    for (name, category, rule) in &RULES {
        let rank = rank_in_category[*category as usize];
        rank_in_category[*category as usize] += 1;
        if token != *name {
            continue;
        }
        let command = match rule {
            Rule::Exact(cmd) => *cmd,
            Rule::Threshold(target) => match parse_argument(rest) {
                Ok(value) => AppCommand::SetThreshold { target: *target, value },
                Err(error) => AppCommand::ArgumentRejected { target: *target, error },
            },
        };
        return Some(Matched {
            category: *category,
            rank,
            command,
        });
    }
    None
}

/// Pick at most one command per category from a batch of message texts,
/// returned in category order.
pub fn select<'a>(texts: impl IntoIterator<Item = &'a str>) -> CommandBatch {
    let mut best: [Option<Matched>; CATEGORY_COUNT] = [None; CATEGORY_COUNT];
    for m in texts.into_iter().filter_map(parse_command) {
        let slot = &mut best[m.category as usize];
        if slot.is_none_or(|current| m.rank < current.rank) {
            *slot = Some(m);
        }
    }
    // CATEGORY_COUNT slots into a CATEGORY_COUNT batch; cannot overflow.
    best.iter().flatten().map(|m| m.command).collect()
}
