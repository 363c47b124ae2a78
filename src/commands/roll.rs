use crate::{Context, Error};
use rand::Rng;
use tracing::info;

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1_000_000;

const FORMAT_HELP: &str = "Your format should be 'NdS', with 'N' representing how many dice \
you'd like to roll and 'S' representing the number of sides on the die.";

/// Roll dice in the form NdS, e.g. 3d6.
#[poise::command(slash_command, prefix_command)]
pub async fn roll(
    ctx: Context<'_>,
    #[description = "Roll in the form NdS, e.g. 3d6"] roll: String,
) -> Result<(), Error> {
    info!("roll command invocation: {}", roll);
    ctx.say(roll_reply(roll.trim())).await?;
    Ok(())
}

fn roll_reply(input: &str) -> String {
    let (count, sides) = match parse_roll(input) {
        Ok(parsed) => parsed,
        Err(guidance) => return guidance.to_string(),
    };

    let mut rng = rand::thread_rng();
    let results: Vec<u32> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
    if results.len() > 1 {
        let total: u64 = results.iter().map(|&r| u64::from(r)).sum();
        format!("You rolled {}: {:?}", total, results)
    } else {
        format!("You rolled: {:?}", results)
    }
}

fn parse_roll(input: &str) -> Result<(u32, u32), &'static str> {
    let mut parts = input.splitn(2, 'd');
    let (Some(count_raw), Some(sides_raw)) = (parts.next(), parts.next()) else {
        return Err(FORMAT_HELP);
    };

    let count: u32 = if count_raw.is_empty() {
        1
    } else {
        count_raw.parse().map_err(|_| FORMAT_HELP)?
    };
    let sides: u32 = sides_raw.parse().map_err(|_| FORMAT_HELP)?;

    if !(1..=MAX_DICE).contains(&count) {
        return Err("Please pick between 1 and 100 for the number of dice.");
    }
    if !(2..=MAX_SIDES).contains(&sides) {
        return Err("Please pick between 2 and 1000000 for the number of sides.");
    }
    Ok((count, sides))
}
