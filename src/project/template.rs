//! Built-in starter project used on first run and after a reset.

use super::Project;

const APP_JS: &str = r"import React, { useState } from 'react';
import { View, Text, StyleSheet } from 'react-native-web';
import Button from './components/Button';
import Counter from './components/Counter';

export default function App() {
  const [count, setCount] = useState(0);

  return (
    <View style={styles.app}>
      <Text style={styles.title}>My React Native Web App</Text>
      <Counter count={count} />
      <View style={styles.buttonContainer}>
        <Button onPress={() => setCount(count + 1)} text='Increment' />
        <Button onPress={() => setCount(count - 1)} text='Decrement' />
        <Button onPress={() => setCount(0)} text='Reset' />
      </View>
    </View>
  );
}

const styles = StyleSheet.create({
  app: {
    flex: 1,
    alignItems: 'center',
    justifyContent: 'center',
    padding: 20,
    backgroundColor: '#ffffff',
    minHeight: 400,
  },
  title: {
    fontSize: 24,
    fontWeight: 'bold',
    color: '#333',
    marginBottom: 30,
  },
  buttonContainer: {
    flexDirection: 'row',
    flexWrap: 'wrap',
    justifyContent: 'center',
    marginTop: 20,
  }
});";

const BUTTON_JS: &str = r"import React from 'react';
import { TouchableOpacity, Text, StyleSheet } from 'react-native-web';

export default function Button({ onPress, text, disabled = false }) {
  return (
    <TouchableOpacity
      style={[styles.button, disabled && styles.disabledButton]}
      onPress={onPress}
      disabled={disabled}
      activeOpacity={0.7}
    >
      <Text style={[styles.text, disabled && styles.disabledText]}>
        {text}
      </Text>
    </TouchableOpacity>
  );
}

const styles = StyleSheet.create({
  button: {
    paddingVertical: 12,
    paddingHorizontal: 20,
    margin: 5,
    backgroundColor: '#4ecdc4',
    borderRadius: 8,
    cursor: 'pointer',
  },
  disabledButton: {
    backgroundColor: '#ccc',
    cursor: 'not-allowed',
  },
  text: {
    color: 'white',
    fontSize: 16,
    fontWeight: '600',
    textAlign: 'center',
  },
  disabledText: {
    color: '#888',
  }
});";

const COUNTER_JS: &str = r"import React from 'react';
import { View, Text, StyleSheet } from 'react-native-web';

export default function Counter({ count }) {
  return (
    <View style={styles.container}>
      <Text style={styles.label}>Counter:</Text>
      <Text style={styles.count}>{count}</Text>
    </View>
  );
}

const styles = StyleSheet.create({
  container: {
    fontSize: 24,
    fontWeight: 'bold',
    marginVertical: 20,
    padding: 20,
    borderWidth: 2,
    borderColor: '#4ecdc4',
    borderRadius: 8,
    backgroundColor: '#f8f9fa',
    alignItems: 'center'
  },
  label: {
    fontSize: 24,
    fontWeight: 'bold',
    marginBottom: 8,
  },
  count: {
    fontSize: 24,
    fontWeight: 'bold',
  }
});";

/// The starter project: an app shell with a counter and three buttons.
#[must_use]
pub fn default_project() -> Project {
    [
        ("/App.js", APP_JS),
        ("/components/Button.js", BUTTON_JS),
        ("/components/Counter.js", COUNTER_JS),
    ]
    .into_iter()
    .collect()
}
