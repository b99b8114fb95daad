//! Line-based terminal frontend: reads skill choices from stdin and prints
//! each resolved turn.
use std::fmt::Write as _;
use std::io::{self, Stdout};
use std::time::Duration;

use async_trait::async_trait;
use clash_core::{
    BattleSnapshot, ClashWinner, Combatant, CombatantId, Roster, SkillId, SkillSelection,
    TurnOutcome,
};
use runtime::{
    BattleEvent, Event, EventBus, PresentationProvider, ProviderKind, RuntimeError,
    SelectionProvider, Topic,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// One line of the skill menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub skill: SkillId,
    pub label: String,
    /// Remaining cooldown; zero means ready.
    pub cooldown: u32,
    pub targets: Vec<(CombatantId, String)>,
}

/// Skill menu for `actor`, in skill order.
pub fn build_menu(actor: &Combatant, roster: &Roster) -> Vec<MenuEntry> {
    actor
        .skills()
        .iter()
        .map(|skill| MenuEntry {
            skill: skill.id.clone(),
            label: format!(
                "{} [{}] power {}+{}x{}",
                skill.name, skill.scope, skill.base_power, skill.coin_bonus, skill.coin_count
            ),
            cooldown: actor.cooldown(&skill.id),
            targets: roster
                .valid_targets(&actor.id, skill.scope)
                .into_iter()
                .map(|id| {
                    let name = display_name(roster, &id);
                    (id, name)
                })
                .collect(),
        })
        .collect()
}

/// Parses `"<skill>"` or `"<skill> <target>"` (1-based menu indices).
///
/// The target may be omitted when the skill has exactly one.
pub fn parse_choice(input: &str, menu: &[MenuEntry]) -> Result<SkillSelection, String> {
    let mut parts = input.split_whitespace();
    let skill_index = parts
        .next()
        .ok_or_else(|| "enter a skill number".to_string())
        .and_then(|raw| parse_index(raw, menu.len()))?;
    let entry = &menu[skill_index];

    if entry.cooldown > 0 {
        return Err(format!("{} is on cooldown for {} more turn(s)", entry.skill, entry.cooldown));
    }
    if entry.targets.is_empty() {
        return Err(format!("{} has no valid target", entry.skill));
    }

    let target_index = match parts.next() {
        Some(raw) => parse_index(raw, entry.targets.len())?,
        None if entry.targets.len() == 1 => 0,
        None => return Err("pick a target number as well".to_string()),
    };

    Ok(SkillSelection::new(
        entry.skill.clone(),
        entry.targets[target_index].0.clone(),
    ))
}

fn parse_index(raw: &str, len: usize) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(format!("'{}' is not between 1 and {}", raw, len)),
    }
}

fn display_name(roster: &Roster, id: &CombatantId) -> String {
    roster
        .get(id)
        .map(|combatant| combatant.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn render_menu(actor: &Combatant, menu: &[MenuEntry]) -> String {
    let mut out = format!(
        "\n{}'s turn (HP {}/{})\n",
        actor.name,
        actor.current_hp(),
        actor.max_hp()
    );
    for (i, entry) in menu.iter().enumerate() {
        let _ = write!(out, "  {}. {}", i + 1, entry.label);
        if entry.cooldown > 0 {
            let _ = write!(out, " (cooldown {})", entry.cooldown);
        }
        out.push('\n');
        for (j, (_, name)) in entry.targets.iter().enumerate() {
            let _ = writeln!(out, "       {}) {}", j + 1, name);
        }
    }
    out.push_str("> ");
    out
}

/// Prompts on stdout and reads the answer from stdin.
pub struct ConsoleSelection {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleSelection {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionProvider for ConsoleSelection {
    async fn select_skill(
        &self,
        actor: &Combatant,
        snapshot: &BattleSnapshot,
    ) -> runtime::Result<SkillSelection> {
        let menu = build_menu(actor, &snapshot.roster);
        let mut lines = self.lines.lock().await;
        loop {
            print!("{}", render_menu(actor, &menu));
            flush_stdout();

            let line = lines
                .next_line()
                .await
                .map_err(|err| RuntimeError::provider(ProviderKind::Selection, err))?
                .ok_or_else(|| RuntimeError::provider(ProviderKind::Selection, "stdin closed"))?;

            match parse_choice(&line, &menu) {
                Ok(selection) => return Ok(selection),
                Err(message) => println!("  {}", message),
            }
        }
    }
}

/// Renders a resolved turn as plain text.
pub fn render_outcome(outcome: &TurnOutcome, snapshot: &BattleSnapshot) -> String {
    let roster = &snapshot.roster;
    let actor = display_name(roster, &outcome.actor);
    let mut out = String::new();

    if let Some(reason) = outcome.skipped {
        let _ = writeln!(out, "{} cannot act ({})", actor, reason);
        return out;
    }

    let skill_name = outcome
        .skill
        .as_ref()
        .and_then(|id| roster.get(&outcome.actor).and_then(|c| c.skill(id)))
        .map(|skill| skill.name.clone())
        .unwrap_or_default();
    match &outcome.target {
        Some(target) if *target != outcome.actor => {
            let _ = writeln!(out, "{} uses {} on {}", actor, skill_name, display_name(roster, target));
        }
        _ => {
            let _ = writeln!(out, "{} uses {}", actor, skill_name);
        }
    }

    if let Some(clash) = &outcome.clash {
        for tick in &clash.ticks {
            let _ = writeln!(
                out,
                "  clash {}: {} {} vs {} {}  (coins {}/{})",
                tick.iteration,
                tick.attacker_name,
                tick.attacker_power,
                tick.defender_name,
                tick.defender_power,
                tick.attacker_coins,
                tick.defender_coins
            );
        }
        let verdict = match clash.winner {
            ClashWinner::Attacker => format!("{} wins the clash", actor),
            ClashWinner::Defender => outcome
                .target
                .as_ref()
                .map(|target| format!("{} wins the clash", display_name(roster, target)))
                .unwrap_or_default(),
            ClashWinner::Draw => "the clash is a draw".to_string(),
        };
        let _ = writeln!(out, "  {}", verdict);
    }

    for hit in &outcome.hits {
        let name = display_name(roster, &hit.target);
        if hit.damage > 0 {
            let (hp, max) = roster
                .get(&hit.target)
                .map(|c| (c.current_hp(), c.max_hp()))
                .unwrap_or_default();
            let _ = writeln!(out, "  {} takes {} damage (HP {}/{})", name, hit.damage, hp, max);
        }
        for effect in &hit.effects_applied {
            let _ = writeln!(out, "  {} gains {} for {} turn(s)", name, effect.name, effect.duration);
        }
        if hit.defeated {
            let _ = writeln!(out, "  {} is defeated", name);
        }
    }
    out
}

/// Prints each turn, then holds it for a fixed delay.
///
/// Output goes to stdout unless another sink is given with
/// [`with_writer`](Self::with_writer).
pub struct ConsolePresentation<W = Stdout> {
    out: Mutex<W>,
    delay: Duration,
}

impl ConsolePresentation {
    pub fn new(delay: Duration) -> Self {
        Self::with_writer(io::stdout(), delay)
    }
}

impl<W> ConsolePresentation<W>
where
    W: io::Write + Send,
{
    pub fn with_writer(out: W, delay: Duration) -> Self {
        Self {
            out: Mutex::new(out),
            delay,
        }
    }

    /// Returns the sink, consuming the presenter.
    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> PresentationProvider for ConsolePresentation<W>
where
    W: io::Write + Send,
{
    async fn present_turn(
        &self,
        outcome: &TurnOutcome,
        snapshot: &BattleSnapshot,
    ) -> runtime::Result<()> {
        {
            let mut out = self.out.lock().await;
            out.write_all(render_outcome(outcome, snapshot).as_bytes())
                .and_then(|()| out.flush())
                .map_err(|err| RuntimeError::provider(ProviderKind::Presentation, err))?;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

/// Prints round banners and the final result from the battle topic.
pub fn spawn_battle_log(bus: &EventBus, roster: Roster) -> JoinHandle<()> {
    let mut rx = bus.subscribe(Topic::Battle);
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Battle(BattleEvent::RoundStarted { round, order })) => {
                    let names: Vec<String> =
                        order.iter().map(|id| display_name(&roster, id)).collect();
                    println!("\n=== Round {} === {}", round, names.join(" > "));
                }
                Ok(Event::Battle(BattleEvent::Ended { victory })) => {
                    println!("\n{}", if victory { "Victory!" } else { "Defeat..." });
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "battle log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn flush_stdout() {
    let _ = io::Write::flush(&mut io::stdout());
}
