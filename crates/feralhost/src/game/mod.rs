//! The game (XT) server's per-connection context and packet set.

mod interaction;

use feralhost_inventory::InventoryAccessor;
use feralhost_protocol::{AccountId, PacketRegistry, XtFormat};

pub use interaction::InteractionCancel;

/// Registry type the game server dispatches with.
pub type GamePackets = PacketRegistry<XtFormat, GameContext>;

/// Everything a game packet handler may touch.
///
/// Owned by exactly one connection task. The session registry makes
/// sure no two connections ever hold the same account's inventory.
pub struct GameContext {
    account: AccountId,
    inventory: InventoryAccessor,
}

impl GameContext {
    pub fn new(account: AccountId, inventory: InventoryAccessor) -> Self {
        Self { account, inventory }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn inventory(&self) -> &InventoryAccessor {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut InventoryAccessor {
        &mut self.inventory
    }
}

/// The packets every game server registers.
pub fn game_packets() -> GamePackets {
    PacketRegistry::new().with(Box::new(InteractionCancel::default()))
}
