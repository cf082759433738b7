mod events;
mod health;
mod rounds;
mod saves;
