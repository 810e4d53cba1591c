//! UseCase 層
//!
//! ドメインの port（EventChannel, GameApi, PasswordMemory）を組み合わせて、
//! ルーム画面のマウントからアンマウントまでの処理を提供します。

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod load_room;
pub mod sync;
pub mod unlock_room;

pub use command::{CommandEmitter, TrackedCommand};
pub use dispatcher::{Applied, DispatchContext, dispatch};
pub use error::{CommandError, LoadRoomError, PasswordError, SyncError};
pub use load_room::LoadRoomUseCase;
pub use sync::{MountParams, RoomSync};
pub use unlock_room::{Unlock, UnlockRoomUseCase};
