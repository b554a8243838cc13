use crate::World;
use crate::components::Material;
use crate::entity::PrimitiveId;

/// At most one highlighted pair of primitives, with the materials they had
/// before highlighting.
///
/// Invariant: while `PairSelected`, `saved_a`/`saved_b` are exactly the
/// materials `a`/`b` carried when `select_pair` ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HighlightSelection {
    #[default]
    Empty,
    PairSelected {
        a: PrimitiveId,
        saved_a: Material,
        b: PrimitiveId,
        saved_b: Material,
    },
}

impl HighlightSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn pair(&self) -> Option<(PrimitiveId, PrimitiveId)> {
        match self {
            Self::Empty => None,
            Self::PairSelected { a, b, .. } => Some((*a, *b)),
        }
    }

    /// Restores saved materials (b first, then a) and empties the selection.
    pub fn clear(&mut self, world: &mut World) {
        if let Self::PairSelected {
            a,
            saved_a,
            b,
            saved_b,
        } = std::mem::take(self)
        {
            world.set_material(b, saved_b);
            world.set_material(a, saved_a);
        }
    }

    /// Clears any previous pair, then highlights `a` and `b`.
    ///
    /// Both materials are captured before either is changed, so `a == b`
    /// restores to the original material. Returns `false` and leaves the
    /// selection empty if either primitive is unknown.
    pub fn select_pair(
        &mut self,
        world: &mut World,
        a: PrimitiveId,
        b: PrimitiveId,
        highlight: &Material,
    ) -> bool {
        self.clear(world);

        let (Some(saved_a), Some(saved_b)) = (world.material(a).cloned(), world.material(b).cloned())
        else {
            return false;
        };

        world.set_material(a, highlight.clone());
        world.set_material(b, highlight.clone());
        *self = Self::PairSelected {
            a,
            saved_a,
            b,
            saved_b,
        };
        true
    }
}
