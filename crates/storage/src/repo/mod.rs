mod milongas;
mod posts;
mod threads;
