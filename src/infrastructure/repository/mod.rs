pub mod inmemory;

pub use inmemory::room::InMemoryRoomStore;
