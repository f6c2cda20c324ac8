//! PGN → state tree builder.
//!
//! Streams the PGN through a `pgn_reader::Visitor`, applying each SAN with
//! full chess rules and growing the arena as it goes. Variations branch
//! from the pre-move cursor: a variation replaces the move it follows, so
//! it hangs off the same parent, not off the new node.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{CastlingMode, Chess, Position};

use chess_core::board::{position_fen, position_from_fen};
use chess_core::{Game, PieceColour, STANDARD_START_FEN};

use crate::error::InvalidGameError;
use crate::navigate::mainline_chain;
use crate::tree::{NodeId, PlayedMove, PositionState, StateTree};

/// Builds the state tree for a game. An illegally-formed move fails the
/// whole parse; there is no partial-tree recovery.
pub fn build_state_tree(game: &Game) -> Result<StateTree, InvalidGameError> {
    let initial = if game.initial_position.trim().is_empty() {
        STANDARD_START_FEN
    } else {
        game.initial_position.trim()
    };

    build_from_pgn(&game.pgn, initial)
}

/// Replays a PGN's mainline and returns the final FEN. The PGN's own FEN
/// header, when present, overrides `initial_fen`.
pub fn final_position(pgn: &str, initial_fen: &str) -> Result<String, InvalidGameError> {
    let initial = chess_core::pgn::extract_header(pgn, "FEN");
    let tree = build_from_pgn(pgn, initial.as_deref().unwrap_or(initial_fen))?;

    let leaf = *mainline_chain(&tree, tree.root_id())
        .last()
        .expect("mainline chain always contains the root");
    Ok(tree.node(leaf).state.fen.clone())
}

fn build_from_pgn(pgn: &str, initial_fen: &str) -> Result<StateTree, InvalidGameError> {
    let mut builder = TreeBuilder {
        initial_fen: initial_fen.to_string(),
        finished: None,
        error: None,
    };

    let mut reader = Reader::new(pgn.as_bytes());
    reader
        .read_game(&mut builder)
        .map_err(|err| InvalidGameError::UnreadablePgn(err.to_string()))?;

    if let Some(err) = builder.error {
        return Err(err);
    }

    // A PGN with no movetext still yields a root-only tree.
    Ok(builder
        .finished
        .unwrap_or_else(|| StateTree::new(PositionState::root(initial_fen))))
}

/// One level of variation nesting. `prev` remembers the cursor (and its
/// position) as it was before the most recent move in this frame.
struct Frame {
    cursor: NodeId,
    position: Chess,
    prev: Option<(NodeId, Chess)>,
    mainline: bool,
}

struct BuildState {
    tree: StateTree,
    frames: Vec<Frame>,
}

struct TreeBuilder {
    initial_fen: String,
    finished: Option<StateTree>,
    error: Option<InvalidGameError>,
}

impl Visitor for TreeBuilder {
    type Tags = ();
    type Movetext = BuildState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), ()> {
        ControlFlow::Continue(())
    }

    fn tag(&mut self, _tags: &mut (), _name: &[u8], _value: RawTag<'_>) -> ControlFlow<()> {
        // Headers come from the Game record; the movetext is all we need.
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: ()) -> ControlFlow<(), BuildState> {
        let position = match position_from_fen(&self.initial_fen) {
            Some(position) => position,
            None => {
                self.error = Some(InvalidGameError::InvalidFen(self.initial_fen.clone()));
                return ControlFlow::Break(());
            }
        };

        let tree = StateTree::new(PositionState::root(self.initial_fen.clone()));
        let root = tree.root_id();

        ControlFlow::Continue(BuildState {
            tree,
            frames: vec![Frame {
                cursor: root,
                position,
                prev: None,
                mainline: true,
            }],
        })
    }

    fn san(&mut self, state: &mut BuildState, san_plus: SanPlus) -> ControlFlow<()> {
        let frame = state
            .frames
            .last_mut()
            .expect("builder always has an open frame");

        let mv = match san_plus.san.to_move(&frame.position) {
            Ok(mv) => mv,
            Err(_) => {
                self.error = Some(InvalidGameError::IllegalMove(san_plus.to_string()));
                return ControlFlow::Break(());
            }
        };

        let move_colour = PieceColour::from(frame.position.turn());
        let uci = mv.to_uci(CastlingMode::Standard).to_string();

        let mut next_position = frame.position.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut next_position, mv).to_string();

        let child = state.tree.add_child(
            frame.cursor,
            frame.mainline,
            PositionState {
                fen: position_fen(&next_position),
                played_move: Some(PlayedMove { san, uci }),
                move_colour: Some(move_colour),
                engine_lines: Vec::new(),
                classification: None,
                accuracy: None,
                opening: None,
            },
        );

        frame.prev = Some((
            frame.cursor,
            std::mem::replace(&mut frame.position, next_position),
        ));
        frame.cursor = child;

        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, state: &mut BuildState) -> ControlFlow<(), Skip> {
        let current = state
            .frames
            .last()
            .expect("builder always has an open frame");

        // Branch from the pre-move cursor; a leading variation with no move
        // to replace branches from the cursor itself.
        let (cursor, position) = match &current.prev {
            Some((parent, position)) => (*parent, position.clone()),
            None => (current.cursor, current.position.clone()),
        };

        state.frames.push(Frame {
            cursor,
            position,
            prev: None,
            mainline: false,
        });

        ControlFlow::Continue(Skip(false))
    }

    fn end_variation(&mut self, state: &mut BuildState) -> ControlFlow<()> {
        if state.frames.len() > 1 {
            state.frames.pop();
        }
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: BuildState) {
        if self.error.is_none() {
            self.finished = Some(state.tree);
        }
    }
}
