//! Engine evaluation values and ranked candidate lines.

use serde::{Deserialize, Serialize};

use crate::colour::PieceColour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationKind {
    Centipawn,
    Mate,
}

/// A single engine score. Centipawn values are stored white-positive;
/// mate values are signed moves-to-mate. Use [`subjective_evaluation`]
/// before comparing scores across mover colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "type")]
    pub kind: EvaluationKind,
    pub value: i32,
}

impl Evaluation {
    pub fn centipawn(value: i32) -> Self {
        Self {
            kind: EvaluationKind::Centipawn,
            value,
        }
    }

    pub fn mate(value: i32) -> Self {
        Self {
            kind: EvaluationKind::Mate,
            value,
        }
    }
}

/// Normalizes an evaluation to the given mover's perspective by negating
/// the value for Black.
pub fn subjective_evaluation(evaluation: Evaluation, colour: PieceColour) -> Evaluation {
    Evaluation {
        kind: evaluation.kind,
        value: match colour {
            PieceColour::White => evaluation.value,
            PieceColour::Black => -evaluation.value,
        },
    }
}

/// Renders an evaluation for display: centipawns as pawns with the given
/// precision (`+` forced for non-negative values when requested), mates as
/// `M<n>` / `+M<n>` / `-M<n>`.
pub fn stringify_evaluation(evaluation: Evaluation, force_sign: bool, precision: usize) -> String {
    match evaluation.kind {
        EvaluationKind::Centipawn => {
            let rounded = format!("{:.*}", precision, evaluation.value as f64 / 100.0);
            if force_sign && evaluation.value >= 0 {
                format!("+{rounded}")
            } else {
                rounded
            }
        }
        EvaluationKind::Mate => {
            if !force_sign {
                return format!("M{}", evaluation.value.abs());
            }
            match evaluation.value {
                value if value > 0 => format!("+M{value}"),
                value if value < 0 => format!("-M{}", value.abs()),
                _ => "M0".to_string(),
            }
        }
    }
}

/// One ranked candidate line reported by an external evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLine {
    /// 1-based multipv rank.
    pub index: u32,
    pub depth: u32,
    /// Principal variation as UCI moves.
    pub pv: Vec<String>,
    pub evaluation: Evaluation,
}

/// The deepest rank-1 line, if any.
pub fn top_engine_line(lines: &[EngineLine]) -> Option<&EngineLine> {
    lines
        .iter()
        .filter(|line| line.index == 1)
        .max_by_key(|line| line.depth)
}

/// The line of the same depth group as `line` carrying the given rank.
pub fn line_group_sibling<'a>(
    lines: &'a [EngineLine],
    line: &EngineLine,
    index: u32,
) -> Option<&'a EngineLine> {
    lines
        .iter()
        .find(|candidate| candidate.depth == line.depth && candidate.index == index)
}
