pub mod common;

#[cfg(test)]
mod test_player_attack;



#[cfg(test)]
mod test_terminal;


#[cfg(test)]
mod test_pacing;
