mod common;
mod notify;
mod routing;
