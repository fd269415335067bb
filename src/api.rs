pub mod powerfox;
